//! Core types for Etendo-style schema administration.
//!
//! This crate defines the data the DDL engine works on:
//!
//! - [`TableSpec`]: a table under construction with its user
//!   [`ColumnSpec`]s, [`ConstraintSpec`]s and [`IndexSpec`]s.
//! - [`ColumnType`]: the fixed catalog of physical column types, picked by
//!   menu ordinal.
//! - [`Compressor`]: shortens generated identifiers to the 30-character
//!   limit while keeping their module prefix.
//! - [`SessionContext`]: the read-only session facts shown in prompts.
//!
//! Validation helpers ([`validate_identifier`], [`validate_column_name`])
//! report recoverable [`ValidationError`]s.
//!
//! # Example
//!
//! ```
//! use etshell_core::*;
//!
//! let mut spec = TableSpec::new("tst_orders");
//! spec.add_column(ColumnSpec::new("status", ColumnType::ShortText).not_null())
//!     .unwrap();
//! spec.add_column(ColumnSpec::new("shipped", ColumnType::YesNo)).unwrap();
//! spec.add_constraint(ConstraintSpec::YnCheck {
//!     column: "shipped".into(),
//!     constraint_name: ConstraintSpec::check_name("tst_orders", "shipped"),
//! })
//! .unwrap();
//!
//! assert_eq!(spec.columns().len(), 2);
//! assert_eq!(compress("tst_orders"), "tst_orders");
//! ```

mod catalog;
mod compress;
mod types;
mod validate;

pub use catalog::{ColumnType, STOP_ORDINAL, catalog_menu, type_label, type_name};
pub use compress::{Compressor, IDENTIFIER_LIMIT, compress, compress_with};
pub use types::*;
pub use validate::{ValidationError, parse_yes, validate_column_name, validate_identifier};
