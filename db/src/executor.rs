//! The query capability shared by the shell and the wizards.
//!
//! Everything that talks to the database goes through [`QueryExecutor`],
//! so the alter wizard and the introspection adapter can be driven by a
//! scripted executor in tests.

use crate::error::Result;

/// One column of a result set, as described by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column name.
    pub name: String,
    /// PostgreSQL type OID.
    pub type_id: u32,
    /// Type modifier (`-1` when unknown).
    pub type_modifier: i32,
    /// 1-based position in the result set.
    pub ordinal_position: usize,
}

/// Fields and text rows of one statement.
///
/// `NULL` values are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub fields: Vec<FieldDescriptor>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    /// Returns `true` if the statement produced no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in result order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Runs SQL against the active database.
pub trait QueryExecutor {
    /// Runs a single statement and returns its fields and rows.
    fn execute(&mut self, sql: &str) -> Result<QueryResult>;

    /// Runs a script of one or more `;`-separated statements.
    fn execute_batch(&mut self, sql: &str) -> Result<()>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &mut E {
    fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        (**self).execute(sql)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        (**self).execute_batch(sql)
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for Box<E> {
    fn execute(&mut self, sql: &str) -> Result<QueryResult> {
        (**self).execute(sql)
    }

    fn execute_batch(&mut self, sql: &str) -> Result<()> {
        (**self).execute_batch(sql)
    }
}
