//! Single-purpose statements used by the alter flow.
//!
//! Each builder returns one or more complete statements terminated by `;`.
//! Table names are qualified with `public` unless they already carry a
//! schema.

use etshell_core::{ColumnSpec, ColumnType};
use rand::Rng;
use tracing::debug;

use crate::assembler::{Assembler, column_definition, foreign_key_clause, qualify, unqualified};

impl<R: Rng> Assembler<R> {
    /// `ALTER TABLE … ADD COLUMN`, followed by the given constraint and
    /// index statements, one per line.
    pub fn add_column(&mut self, table: &str, column: &ColumnSpec, extra_statements: &[String]) -> String {
        let mut statements = vec![format!(
            "ALTER TABLE {} ADD COLUMN {};",
            qualify(table),
            column_definition(column)
        )];
        statements.extend(extra_statements.iter().map(|s| terminated(s)));
        debug!(table, column = %column.name, extra = extra_statements.len(), "Assembled ADD COLUMN");
        statements.join("\n")
    }

    /// `ALTER TABLE … DROP COLUMN`.
    pub fn drop_column(&mut self, table: &str, column: &str) -> String {
        format!("ALTER TABLE {} DROP COLUMN {column};", qualify(table))
    }

    /// `DROP TABLE`.
    pub fn drop_table(&mut self, table: &str) -> String {
        format!("DROP TABLE {};", qualify(table))
    }

    /// `ALTER TABLE … RENAME COLUMN`.
    pub fn rename_column(&mut self, table: &str, old: &str, new: &str) -> String {
        format!("ALTER TABLE {} RENAME COLUMN {old} TO {new};", qualify(table))
    }

    /// `ALTER TABLE … ALTER COLUMN … TYPE`, casting existing values.
    pub fn change_column_type(&mut self, table: &str, column: &str, new_type: ColumnType) -> String {
        let sql_type = new_type.sql_type();
        format!(
            "ALTER TABLE {} ALTER COLUMN {column} TYPE {sql_type} USING {column}::{sql_type};",
            qualify(table)
        )
    }

    /// `ALTER TABLE … ADD CONSTRAINT … CHECK`. The name is compressed if needed.
    pub fn add_check_constraint(&mut self, table: &str, constraint_name: &str, predicate: &str) -> String {
        let name = self.fit(constraint_name);
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {name} CHECK ({predicate});",
            qualify(table)
        )
    }

    /// `ALTER TABLE … ADD CONSTRAINT … FOREIGN KEY`. The name is compressed if needed.
    pub fn add_foreign_key(
        &mut self,
        table: &str,
        column: &str,
        external_table: &str,
        external_column: &str,
        fk_name: &str,
    ) -> String {
        let name = self.fit(fk_name);
        format!(
            "ALTER TABLE {} ADD CONSTRAINT {name} {};",
            qualify(table),
            foreign_key_clause(column, external_table, external_column)
        )
    }

    /// `ALTER TABLE … DROP CONSTRAINT`.
    ///
    /// The name refers to an existing constraint and is used verbatim.
    pub fn drop_constraint(&mut self, table: &str, constraint_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {constraint_name};",
            qualify(table)
        )
    }

    /// `CREATE INDEX <table>_<column>_idx`, the name compressed if needed.
    pub fn create_index(&mut self, table: &str, column: &str) -> String {
        let name = self.fit(&format!("{}_{column}_idx", unqualified(table)));
        format!("CREATE INDEX {name} ON {} ({column});", qualify(table))
    }
}

fn terminated(statement: &str) -> String {
    let trimmed = statement.trim_end();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{trimmed};")
    }
}
