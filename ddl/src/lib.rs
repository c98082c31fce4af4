//! PostgreSQL DDL templates for Etendo-style audited tables.
//!
//! This crate turns [`TableSpec`](etshell_core::TableSpec) and
//! [`ColumnSpec`](etshell_core::ColumnSpec) values into SQL text. It does
//! no I/O and never executes anything; the caller decides whether the text
//! is printed, executed or saved.
//!
//! # Architecture
//!
//! - **`assembler`**: the [`Assembler`], which owns the identifier
//!   compressor, and shared formatting helpers
//! - **`create`**: `CREATE TABLE` with the audit scaffold, ownership and
//!   indexes
//! - **`alter`**: single-purpose `ALTER TABLE`, `CREATE INDEX` and
//!   `DROP TABLE` statements
//!
//! # Quick start
//!
//! ```
//! use etshell_core::{ColumnSpec, ColumnType, TableSpec};
//! use etshell_ddl::Assembler;
//!
//! let mut spec = TableSpec::new("tst_orders");
//! spec.add_column(ColumnSpec::new("shipped", ColumnType::YesNo)).unwrap();
//!
//! let mut ddl = Assembler::new();
//! let create = ddl.create_table(&spec);
//! assert!(create.contains("shipped character (1)"));
//!
//! let rename = ddl.rename_column("tst_orders", "shipped", "isshipped");
//! assert_eq!(rename, "ALTER TABLE public.tst_orders RENAME COLUMN shipped TO isshipped;");
//! ```
//!
//! # Identifier limits
//!
//! Every generated constraint and index name passes through the
//! assembler's [`Compressor`](etshell_core::Compressor), so none exceeds 30
//! characters. Each shortening is recorded and can be collected with
//! [`Assembler::take_renames`] to tell the user. Names of existing objects
//! (for example in [`Assembler::drop_constraint`]) are used verbatim.

mod alter;
mod assembler;
mod create;

pub use assembler::{
    Assembler, DEFAULT_SCHEMA, Rename, column_definition, qualify, unqualified, yes_no_predicate,
};
