//! Live column discovery for the alter flow.

use etshell_core::type_label;
use tracing::debug;

use crate::error::Result;
use crate::executor::QueryExecutor;

/// A column as it currently exists in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveColumn {
    pub name: String,
    /// Human-readable type, e.g. `character varying (32)`.
    pub type_label: String,
    /// 1-based position in the table.
    pub ordinal_position: usize,
}

/// Lists the columns of `table` in table order.
///
/// Issues `SELECT * FROM <table> WHERE false`, which returns the field
/// descriptors without reading any rows. Errors from the executor are
/// returned as they are.
///
/// # Examples
///
/// ```
/// use etshell_db::{FieldDescriptor, QueryExecutor, QueryResult, Result, describe_columns};
///
/// struct OneColumn;
///
/// impl QueryExecutor for OneColumn {
///     fn execute(&mut self, _sql: &str) -> Result<QueryResult> {
///         Ok(QueryResult {
///             fields: vec![FieldDescriptor {
///                 name: "status".into(),
///                 type_id: 1043,
///                 type_modifier: 64,
///                 ordinal_position: 1,
///             }],
///             rows: vec![],
///         })
///     }
///
///     fn execute_batch(&mut self, _sql: &str) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let columns = describe_columns(&mut OneColumn, "tst_orders").unwrap();
/// assert_eq!(columns[0].name, "status");
/// assert_eq!(columns[0].type_label, "character varying (60)");
/// ```
pub fn describe_columns<E>(executor: &mut E, table: &str) -> Result<Vec<LiveColumn>>
where
    E: QueryExecutor + ?Sized,
{
    let result = executor.execute(&format!("SELECT * FROM {table} WHERE false"))?;

    let mut fields = result.fields;
    fields.sort_by_key(|f| f.ordinal_position);
    let columns: Vec<LiveColumn> = fields
        .into_iter()
        .map(|f| LiveColumn {
            type_label: type_label(f.type_id, f.type_modifier),
            name: f.name,
            ordinal_position: f.ordinal_position,
        })
        .collect();

    debug!(table, columns = columns.len(), "Described live columns");
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;
    use crate::executor::{FieldDescriptor, QueryResult};

    /// Replays one canned response and records the SQL it was given.
    struct Canned {
        response: Result<QueryResult>,
        seen: Vec<String>,
    }

    impl QueryExecutor for Canned {
        fn execute(&mut self, sql: &str) -> Result<QueryResult> {
            self.seen.push(sql.to_string());
            self.response.clone()
        }

        fn execute_batch(&mut self, _sql: &str) -> Result<()> {
            panic!("introspection must not run scripts");
        }
    }

    fn field(name: &str, type_id: u32, type_modifier: i32, position: usize) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            type_id,
            type_modifier,
            ordinal_position: position,
        }
    }

    #[test]
    fn test_issues_empty_select() {
        let mut executor = Canned {
            response: Ok(QueryResult::default()),
            seen: vec![],
        };
        let columns = describe_columns(&mut executor, "tst_orders").unwrap();
        assert!(columns.is_empty());
        assert_eq!(executor.seen, vec!["SELECT * FROM tst_orders WHERE false"]);
    }

    #[test]
    fn test_maps_types_and_orders_by_position() {
        let mut executor = Canned {
            response: Ok(QueryResult {
                fields: vec![
                    field("created", 1114, -1, 3),
                    field("tst_orders_id", 1043, 36, 1),
                    field("isactive", 1042, 5, 2),
                    field("qty", 1700, -1, 4),
                ],
                rows: vec![],
            }),
            seen: vec![],
        };
        let columns = describe_columns(&mut executor, "tst_orders").unwrap();

        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["tst_orders_id", "isactive", "created", "qty"]);
        assert_eq!(columns[0].type_label, "character varying (32)");
        assert_eq!(columns[1].type_label, "character (1)");
        assert_eq!(columns[2].type_label, "timestamp without time zone");
        assert_eq!(columns[3].type_label, "numeric");
    }

    #[test]
    fn test_scenario_d_error_is_unmodified() {
        let expected = QueryError::Rejected {
            code: Some("42P01".into()),
            message: "relation \"tst_missing\" does not exist".into(),
        };
        let mut executor = Canned {
            response: Err(expected.clone()),
            seen: vec![],
        };
        let err = describe_columns(&mut executor, "tst_missing").unwrap_err();
        assert_eq!(err, expected);
    }
}
