//! `CREATE TABLE` generation with the audit scaffold.
//!
//! Every generated table starts with the Etendo audit columns and ends
//! with the fixed constraints, whatever the user asked for:
//!
//! - `<table>_id` primary key
//! - `ad_client_id` → `ad_client`, `ad_org_id` → `ad_org`,
//!   `createdby` → `ad_user` foreign keys
//! - `updatedby` → `ad_user` foreign key (unless disabled on the table)
//! - `isactive` Y/N check
//!
//! User columns and constraints sit between the scaffold columns and the
//! fixed constraints, in the order they were added. The statement is
//! followed by the ownership change and one `CREATE INDEX` per scheduled
//! index.

use etshell_core::{ConstraintSpec, TableSpec};
use rand::Rng;
use tracing::debug;

use crate::assembler::{Assembler, column_definition, foreign_key_clause, qualify, yes_no_predicate};

/// Audit columns that precede the user columns.
fn scaffold_columns(table: &str) -> Vec<String> {
    vec![
        format!("{table}_id character varying(32) NOT NULL"),
        "ad_client_id character varying(32) NOT NULL".to_string(),
        "ad_org_id character varying(32) NOT NULL".to_string(),
        "isactive character(1) NOT NULL DEFAULT 'N'::bpchar".to_string(),
        "created timestamp without time zone DEFAULT now()".to_string(),
        "createdby character varying(32) NOT NULL".to_string(),
        "updated timestamp without time zone DEFAULT now()".to_string(),
        "updatedby character varying(32)".to_string(),
    ]
}

impl<R: Rng> Assembler<R> {
    /// Generates the complete `CREATE TABLE` script for `spec`.
    ///
    /// # Examples
    ///
    /// ```
    /// use etshell_core::{ColumnSpec, ColumnType, TableSpec};
    /// use etshell_ddl::Assembler;
    ///
    /// let mut spec = TableSpec::new("tst_orders");
    /// spec.add_column(ColumnSpec::new("status", ColumnType::ShortText).not_null())
    ///     .unwrap();
    ///
    /// let sql = Assembler::new().create_table(&spec);
    /// assert!(sql.contains("CREATE TABLE public.tst_orders"));
    /// assert!(sql.contains("status character varying (60) NOT NULL"));
    /// assert!(sql.contains("OWNER TO tad;"));
    /// ```
    pub fn create_table(&mut self, spec: &TableSpec) -> String {
        let table = spec.full_name.as_str();

        let mut entries = scaffold_columns(table);
        entries.extend(spec.columns().iter().map(column_definition));
        for constraint in spec.constraints() {
            let entry = self.constraint_entry(constraint);
            entries.push(entry);
        }
        entries.extend(self.fixed_constraints(spec));

        let indexes: Vec<String> = spec
            .indexes()
            .iter()
            .map(|index| self.create_index(&index.table, &index.column))
            .collect();

        let mut sql = format!(
            r#"CREATE TABLE {qualified}
(
{entries}
);

ALTER TABLE {qualified}
  OWNER TO {owner};
"#,
            qualified = qualify(table),
            entries = entries.join(",\n"),
            owner = spec.owner,
        );

        if !indexes.is_empty() {
            sql.push('\n');
            sql.push_str(&indexes.join("\n"));
            sql.push('\n');
        }

        debug!(
            table,
            columns = spec.columns().len(),
            constraints = spec.constraints().len(),
            indexes = spec.indexes().len(),
            "Assembled CREATE TABLE"
        );
        sql
    }

    fn constraint_entry(&mut self, constraint: &ConstraintSpec) -> String {
        let name = self.fit(constraint.name());
        match constraint {
            ConstraintSpec::ForeignKey { column, reference } => format!(
                "CONSTRAINT {name} {}",
                foreign_key_clause(column, &reference.external_table, &reference.external_column)
            ),
            ConstraintSpec::YnCheck { column, .. } => {
                format!("CONSTRAINT {name} CHECK ({})", yes_no_predicate(column))
            }
        }
    }

    fn fixed_constraints(&mut self, spec: &TableSpec) -> Vec<String> {
        let table = spec.full_name.as_str();
        let mut constraints = vec![
            format!(
                "CONSTRAINT {} PRIMARY KEY ({table}_id)",
                self.fit(&format!("{table}_pk"))
            ),
            format!(
                "CONSTRAINT {} {}",
                self.fit(&format!("{table}_client")),
                foreign_key_clause("ad_client_id", "ad_client", "ad_client_id")
            ),
            format!(
                "CONSTRAINT {} {}",
                self.fit(&format!("{table}_org")),
                foreign_key_clause("ad_org_id", "ad_org", "ad_org_id")
            ),
            format!(
                "CONSTRAINT {} {}",
                self.fit(&format!("{table}_created")),
                foreign_key_clause("createdby", "ad_user", "ad_user_id")
            ),
        ];
        if spec.updated_by_fk {
            constraints.push(format!(
                "CONSTRAINT {} {}",
                self.fit(&format!("{table}_updated")),
                foreign_key_clause("updatedby", "ad_user", "ad_user_id")
            ));
        }
        constraints.push(format!(
            "CONSTRAINT {} CHECK ({})",
            self.fit(&format!("{table}_isactive")),
            yes_no_predicate("isactive")
        ));
        constraints
    }
}
