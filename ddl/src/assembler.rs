//! The [`Assembler`] and the small formatting helpers shared by the
//! statement builders.

use etshell_core::{ColumnSpec, Compressor};
use rand::Rng;
use rand::rngs::ThreadRng;

/// Schema used for unqualified table names.
pub const DEFAULT_SCHEMA: &str = "public";

/// Builds DDL text from table and column specifications.
///
/// The assembler owns the [`Compressor`] applied to every generated
/// constraint and index name, so a seeded compressor makes its output
/// reproducible.
///
/// # Examples
///
/// ```
/// use etshell_ddl::Assembler;
///
/// let mut ddl = Assembler::new();
/// assert_eq!(
///     ddl.drop_column("tst_orders", "status"),
///     "ALTER TABLE public.tst_orders DROP COLUMN status;"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Assembler<R = ThreadRng> {
    compressor: Compressor<R>,
    renames: Vec<Rename>,
}

/// A generated identifier the assembler had to shorten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub original: String,
    pub shortened: String,
}

impl Assembler<ThreadRng> {
    /// Creates an assembler backed by the thread-local RNG.
    pub fn new() -> Self {
        Self::with_compressor(Compressor::new())
    }
}

impl Default for Assembler<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Assembler<R> {
    /// Creates an assembler around an existing compressor.
    pub fn with_compressor(compressor: Compressor<R>) -> Self {
        Self {
            compressor,
            renames: Vec::new(),
        }
    }

    /// Gives access to the compressor, e.g. to pre-shorten names the user
    /// should be told about.
    pub fn compressor(&mut self) -> &mut Compressor<R> {
        &mut self.compressor
    }

    /// Identifiers shortened since the last call, in generation order.
    pub fn take_renames(&mut self) -> Vec<Rename> {
        std::mem::take(&mut self.renames)
    }

    /// Shortens a generated identifier if it exceeds the limit, recording
    /// the change.
    pub(crate) fn fit(&mut self, identifier: &str) -> String {
        let fitted = self.compressor.shorten(identifier);
        if fitted != identifier {
            self.renames.push(Rename {
                original: identifier.to_string(),
                shortened: fitted.clone(),
            });
        }
        fitted
    }
}

/// Qualifies a table with [`DEFAULT_SCHEMA`] unless it already names a schema.
pub fn qualify(table: &str) -> String {
    if table.contains('.') {
        table.to_string()
    } else {
        format!("{DEFAULT_SCHEMA}.{table}")
    }
}

/// Strips a schema qualifier, if any.
pub fn unqualified(table: &str) -> &str {
    table.rsplit_once('.').map_or(table, |(_, name)| name)
}

/// Renders a column definition: `name type [NOT NULL] [DEFAULT value]`.
pub fn column_definition(column: &ColumnSpec) -> String {
    let mut definition = format!("{} {}", column.name, column.column_type.sql_type());
    if column.not_null {
        definition.push_str(" NOT NULL");
    }
    if let Some(default) = column.default_value.as_deref().filter(|d| !d.trim().is_empty()) {
        definition.push_str(" DEFAULT ");
        definition.push_str(default.trim());
    }
    definition
}

/// Predicate of a Y/N check on `column`.
pub fn yes_no_predicate(column: &str) -> String {
    format!("{column} = 'Y'::bpchar OR {column} = 'N'::bpchar")
}

/// Body of a foreign key clause, shared by `CREATE TABLE` and `ALTER TABLE`.
pub(crate) fn foreign_key_clause(column: &str, external_table: &str, external_column: &str) -> String {
    format!(
        "FOREIGN KEY ({column})\n  REFERENCES {} ({external_column}) MATCH SIMPLE\n  ON UPDATE NO ACTION\n  ON DELETE NO ACTION",
        qualify(external_table)
    )
}
