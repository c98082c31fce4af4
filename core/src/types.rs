//! Table specification types.
//!
//! A [`TableSpec`] is built incrementally by the wizard and consumed once by
//! the DDL assembler. Columns and constraints are append-only: a table
//! hands out slices, and the `add_*` methods reject duplicates before
//! anything is appended.

use serde::{Deserialize, Serialize};

use crate::catalog::ColumnType;
use crate::validate::ValidationError;

/// Role that owns generated tables when no session user is known.
pub const DEFAULT_OWNER: &str = "tad";

/// Reference from a column to a column of another table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced table (unqualified, resolved in `public`).
    pub external_table: String,
    /// Referenced column.
    pub external_column: String,
    /// Constraint name, already within the identifier limit.
    pub constraint_name: String,
    /// Whether the column links to a parent record; schedules an index.
    pub link_to_parent: bool,
}

impl ForeignKeyRef {
    /// Conventional constraint name before compression: `<table>_<external_table>`.
    pub fn default_name(table: &str, external_table: &str) -> String {
        format!("{table}_{external_table}")
    }

    /// Fallback name used when the conventional one is already taken.
    pub fn column_name(table: &str, column: &str) -> String {
        format!("{table}_{column}_fk")
    }
}

/// One column to add to a table.
///
/// # Examples
///
/// ```
/// use etshell_core::{ColumnSpec, ColumnType};
///
/// let column = ColumnSpec::new("status", ColumnType::ShortText)
///     .not_null()
///     .with_default("'DR'");
/// assert!(column.not_null);
/// assert_eq!(column.default_value.as_deref(), Some("'DR'"));
/// assert!(!column.is_foreign_key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, at most 30 characters.
    pub name: String,
    /// Catalog type of the column.
    pub column_type: ColumnType,
    /// Whether the column is `NOT NULL`.
    pub not_null: bool,
    /// Raw SQL default expression.
    pub default_value: Option<String>,
    /// Foreign key carried by the column.
    pub foreign_key: Option<ForeignKeyRef>,
}

impl ColumnSpec {
    /// Creates a nullable column without default or foreign key.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            not_null: false,
            default_value: None,
            foreign_key: None,
        }
    }

    /// Marks the column `NOT NULL`.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the default expression.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Attaches a foreign key reference.
    pub fn with_foreign_key(mut self, reference: ForeignKeyRef) -> Self {
        self.foreign_key = Some(reference);
        self
    }

    /// Whether the column carries a foreign key.
    pub fn is_foreign_key(&self) -> bool {
        self.foreign_key.is_some()
    }
}

/// A table-level constraint declared by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConstraintSpec {
    /// `FOREIGN KEY (column) REFERENCES public.<external_table> (<external_column>)`.
    ForeignKey {
        /// Owning column.
        column: String,
        /// Referenced table and column.
        reference: ForeignKeyRef,
    },
    /// `CHECK (column = 'Y' OR column = 'N')` for single-character flags.
    YnCheck {
        /// Checked column.
        column: String,
        /// Constraint name, already within the identifier limit.
        constraint_name: String,
    },
}

impl ConstraintSpec {
    /// Conventional Y/N check name before compression: `<table>_<column>_chk`.
    pub fn check_name(table: &str, column: &str) -> String {
        format!("{table}_{column}_chk")
    }

    /// Returns the constraint name.
    pub fn name(&self) -> &str {
        match self {
            ConstraintSpec::ForeignKey { reference, .. } => &reference.constraint_name,
            ConstraintSpec::YnCheck {
                constraint_name, ..
            } => constraint_name,
        }
    }

    /// Returns the constrained column.
    pub fn column(&self) -> &str {
        match self {
            ConstraintSpec::ForeignKey { column, .. } | ConstraintSpec::YnCheck { column, .. } => {
                column
            }
        }
    }
}

/// An index to create after the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    /// Indexed table.
    pub table: String,
    /// Indexed column.
    pub column: String,
}

impl IndexSpec {
    /// Creates an index spec.
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Conventional index name before compression: `<table>_<column>_idx`.
    pub fn default_name(&self) -> String {
        format!("{}_{}_idx", self.table, self.column)
    }
}

/// Specification of a table to create.
///
/// # Examples
///
/// ```
/// use etshell_core::{ColumnSpec, ColumnType, TableSpec, ValidationError};
///
/// let mut spec = TableSpec::new("tst_orders");
/// spec.add_column(ColumnSpec::new("status", ColumnType::ShortText)).unwrap();
///
/// let again = spec.add_column(ColumnSpec::new("status", ColumnType::Code));
/// assert_eq!(again, Err(ValidationError::DuplicateColumn("status".into())));
/// assert_eq!(spec.columns().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// `<prefix>_<name>`, within the identifier limit.
    pub full_name: String,
    /// Role named in the `OWNER TO` statement.
    pub owner: String,
    /// Whether the `updatedby` column references `ad_user`.
    pub updated_by_fk: bool,
    columns: Vec<ColumnSpec>,
    constraints: Vec<ConstraintSpec>,
    indexes: Vec<IndexSpec>,
}

impl TableSpec {
    /// Creates an empty spec owned by [`DEFAULT_OWNER`].
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            owner: DEFAULT_OWNER.to_string(),
            updated_by_fk: true,
            columns: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Sets the owning role.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// User columns in append order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// User constraints in append order.
    pub fn constraints(&self) -> &[ConstraintSpec] {
        &self.constraints
    }

    /// Scheduled indexes in append order.
    pub fn indexes(&self) -> &[IndexSpec] {
        &self.indexes
    }

    /// Whether a column with this name exists (case-insensitive, as PostgreSQL
    /// folds unquoted identifiers).
    ///
    /// The audit scaffold columns count as existing.
    pub fn has_column(&self, name: &str) -> bool {
        self.scaffold_column_names()
            .iter()
            .any(|scaffold| scaffold.eq_ignore_ascii_case(name))
            || self
                .columns
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Whether a constraint with this name exists, including the fixed ones.
    pub fn has_constraint(&self, name: &str) -> bool {
        self.fixed_constraint_names()
            .iter()
            .any(|fixed| fixed.eq_ignore_ascii_case(name))
            || self
                .constraints
                .iter()
                .any(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateColumn`] if the name is taken;
    /// the table is left unchanged.
    pub fn add_column(&mut self, column: ColumnSpec) -> Result<(), ValidationError> {
        if self.has_column(&column.name) {
            return Err(ValidationError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Appends a constraint.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateConstraint`] if the name is taken.
    pub fn add_constraint(&mut self, constraint: ConstraintSpec) -> Result<(), ValidationError> {
        if self.has_constraint(constraint.name()) {
            return Err(ValidationError::DuplicateConstraint(
                constraint.name().to_string(),
            ));
        }
        self.constraints.push(constraint);
        Ok(())
    }

    /// Appends a column together with the constraints it brings, or nothing
    /// at all.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateColumn`] or
    /// [`ValidationError::DuplicateConstraint`] if any name is taken, on the
    /// table or among `constraints`; the table is left unchanged.
    pub fn add_column_with_constraints(
        &mut self,
        column: ColumnSpec,
        constraints: Vec<ConstraintSpec>,
    ) -> Result<(), ValidationError> {
        if self.has_column(&column.name) {
            return Err(ValidationError::DuplicateColumn(column.name));
        }
        for (i, constraint) in constraints.iter().enumerate() {
            let name = constraint.name();
            let repeated = constraints[..i]
                .iter()
                .any(|earlier| earlier.name().eq_ignore_ascii_case(name));
            if repeated || self.has_constraint(name) {
                return Err(ValidationError::DuplicateConstraint(name.to_string()));
            }
        }
        self.columns.push(column);
        self.constraints.extend(constraints);
        Ok(())
    }

    /// Schedules an index.
    pub fn add_index(&mut self, index: IndexSpec) {
        self.indexes.push(index);
    }

    /// Names of the audit columns every table carries.
    pub fn scaffold_column_names(&self) -> Vec<String> {
        let mut names = vec![format!("{}_id", self.full_name)];
        names.extend(
            [
                "ad_client_id",
                "ad_org_id",
                "isactive",
                "created",
                "createdby",
                "updated",
                "updatedby",
            ]
            .map(String::from),
        );
        names
    }

    /// Names of the scaffold constraints every table carries.
    pub fn fixed_constraint_names(&self) -> Vec<String> {
        let table = &self.full_name;
        ["pk", "client", "org", "created", "updated", "isactive"]
            .iter()
            .map(|suffix| format!("{table}_{suffix}"))
            .collect()
    }
}

/// Read-only session facts the wizard uses for labels and ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Active database name.
    pub pivot: String,
    /// Database user of the session.
    pub db_user: String,
}

impl SessionContext {
    /// Creates a session context.
    pub fn new(pivot: impl Into<String>, db_user: impl Into<String>) -> Self {
        Self {
            pivot: pivot.into(),
            db_user: db_user.into(),
        }
    }

    /// Prompt label such as `[openbravo]` or `[openbravo][tst_orders]`.
    pub fn label(&self, table: Option<&str>) -> String {
        match table {
            Some(table) => format!("[{}][{}]", self.pivot, table),
            None => format!("[{}]", self.pivot),
        }
    }

    /// Connection label such as `tad@openbravo`.
    pub fn target(&self) -> String {
        format!("{}@{}", self.db_user, self.pivot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fk(name: &str) -> ForeignKeyRef {
        ForeignKeyRef {
            external_table: "c_order".into(),
            external_column: "c_order_id".into(),
            constraint_name: name.into(),
            link_to_parent: false,
        }
    }

    #[test]
    fn test_duplicate_column_is_rejected_case_insensitively() {
        let mut spec = TableSpec::new("tst_orders");
        spec.add_column(ColumnSpec::new("status", ColumnType::ShortText))
            .unwrap();

        let err = spec
            .add_column(ColumnSpec::new("STATUS", ColumnType::Code))
            .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateColumn("STATUS".into()));
        assert_eq!(spec.columns().len(), 1);
        assert_eq!(spec.columns()[0].column_type, ColumnType::ShortText);
    }

    #[test]
    fn test_columns_keep_append_order() {
        let mut spec = TableSpec::new("tst_orders");
        for name in ["b", "a", "c"] {
            spec.add_column(ColumnSpec::new(name, ColumnType::Id)).unwrap();
        }
        let names: Vec<_> = spec.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_constraint_names_must_be_unique() {
        let mut spec = TableSpec::new("tst_orders");
        spec.add_constraint(ConstraintSpec::ForeignKey {
            column: "c_order_id".into(),
            reference: fk("tst_orders_c_order"),
        })
        .unwrap();

        let dup = spec.add_constraint(ConstraintSpec::YnCheck {
            column: "x".into(),
            constraint_name: "tst_orders_c_order".into(),
        });
        assert_eq!(
            dup,
            Err(ValidationError::DuplicateConstraint("tst_orders_c_order".into()))
        );
        assert_eq!(spec.constraints().len(), 1);
    }

    #[test]
    fn test_column_is_not_added_without_its_constraints() {
        let mut spec = TableSpec::new("tst_orders");
        spec.add_constraint(ConstraintSpec::ForeignKey {
            column: "c_order_id".into(),
            reference: fk("tst_orders_c_order"),
        })
        .unwrap();

        let column = ColumnSpec::new("c_orderalt_id", ColumnType::Id)
            .with_foreign_key(fk("TST_ORDERS_C_ORDER"));
        let clash = ConstraintSpec::ForeignKey {
            column: "c_orderalt_id".into(),
            reference: fk("TST_ORDERS_C_ORDER"),
        };
        assert_eq!(
            spec.add_column_with_constraints(column.clone(), vec![clash]),
            Err(ValidationError::DuplicateConstraint("TST_ORDERS_C_ORDER".into()))
        );
        assert!(spec.columns().is_empty());
        assert_eq!(spec.constraints().len(), 1);

        let pair = vec![
            ConstraintSpec::YnCheck {
                column: "c_orderalt_id".into(),
                constraint_name: "tst_orders_alt".into(),
            },
            ConstraintSpec::YnCheck {
                column: "c_orderalt_id".into(),
                constraint_name: "tst_orders_alt".into(),
            },
        ];
        assert!(spec.add_column_with_constraints(column.clone(), pair).is_err());
        assert!(spec.columns().is_empty());

        let ok = ConstraintSpec::ForeignKey {
            column: "c_orderalt_id".into(),
            reference: fk("tst_orders_c_orderalt_id_fk"),
        };
        spec.add_column_with_constraints(column, vec![ok]).unwrap();
        assert_eq!(spec.columns().len(), 1);
        assert_eq!(spec.constraints().len(), 2);
    }

    #[test]
    fn test_scaffold_columns_are_reserved() {
        let mut spec = TableSpec::new("tst_orders");
        assert!(spec.has_column("tst_orders_id"));
        assert!(spec.has_column("CreatedBy"));
        assert_eq!(
            spec.add_column(ColumnSpec::new("isactive", ColumnType::YesNo)),
            Err(ValidationError::DuplicateColumn("isactive".into()))
        );
        assert!(spec.columns().is_empty());
    }

    #[test]
    fn test_fixed_constraint_names_are_reserved() {
        let mut spec = TableSpec::new("tst_orders");
        assert!(spec.has_constraint("tst_orders_pk"));
        assert!(spec.has_constraint("TST_ORDERS_ISACTIVE"));
        assert!(
            spec.add_constraint(ConstraintSpec::YnCheck {
                column: "isactive".into(),
                constraint_name: "tst_orders_isactive".into(),
            })
            .is_err()
        );
    }

    #[test]
    fn test_constraint_accessors() {
        let c = ConstraintSpec::YnCheck {
            column: "shipped".into(),
            constraint_name: "tst_orders_shipped_chk".into(),
        };
        assert_eq!(c.name(), "tst_orders_shipped_chk");
        assert_eq!(c.column(), "shipped");
        assert_eq!(
            ConstraintSpec::check_name("tst_orders", "shipped"),
            "tst_orders_shipped_chk"
        );
    }

    #[test]
    fn test_constraint_serializes_with_kind_tag() {
        let c = ConstraintSpec::YnCheck {
            column: "shipped".into(),
            constraint_name: "tst_orders_shipped_chk".into(),
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["kind"], "ynCheck");
    }

    #[test]
    fn test_session_labels() {
        let session = SessionContext::new("openbravo", "tad");
        assert_eq!(session.label(None), "[openbravo]");
        assert_eq!(session.label(Some("tst_orders")), "[openbravo][tst_orders]");
        assert_eq!(session.target(), "tad@openbravo");
    }

    #[test]
    fn test_index_default_name() {
        let index = IndexSpec::new("tst_orders", "c_order_id");
        assert_eq!(index.default_name(), "tst_orders_c_order_id_idx");
    }
}
