//! The alter-table wizard.
//!
//! Each call to [`AlterTableWizard::next_statement`] reads the live columns
//! of the table, lets the user pick one (or `0` for a new column, `X` to
//! leave) and an operation, and returns the resulting statement. Nothing is
//! executed here; the caller decides what happens to each statement before
//! asking for the next one, so the listing always reflects the table as it
//! is now.

use etshell_core::{ConstraintSpec, ForeignKeyRef, SessionContext, ValidationError, parse_yes};
use etshell_db::{LiveColumn, QueryExecutor, describe_columns};
use etshell_ddl::{Assembler, unqualified, yes_no_predicate};
use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::debug;

use crate::columns::{
    announce_renames, ask_column_name, ask_column_type, ask_new_column, ask_replacement_type,
    fit_with_notice,
};
use crate::console::Console;
use crate::error::Result;
use crate::pending::PendingDdl;

/// Operations offered for an existing column, by menu ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterOperation {
    DropColumn,
    AddForeignKey,
    AddYesNoCheck,
    DropConstraint,
    RenameColumn,
    ChangeType,
    Back,
}

impl AlterOperation {
    pub const ALL: [AlterOperation; 7] = [
        AlterOperation::DropColumn,
        AlterOperation::AddForeignKey,
        AlterOperation::AddYesNoCheck,
        AlterOperation::DropConstraint,
        AlterOperation::RenameColumn,
        AlterOperation::ChangeType,
        AlterOperation::Back,
    ];

    /// Parses a menu answer such as `"3"`.
    pub fn parse_choice(answer: &str) -> Option<Self> {
        let ordinal = answer.trim().parse::<usize>().ok()?;
        Self::ALL.get(ordinal.checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            AlterOperation::DropColumn => "Drop column",
            AlterOperation::AddForeignKey => "Add foreign key",
            AlterOperation::AddYesNoCheck => "Add Y/N check",
            AlterOperation::DropConstraint => "Drop constraint",
            AlterOperation::RenameColumn => "Rename column",
            AlterOperation::ChangeType => "Change type",
            AlterOperation::Back => "Back to columns",
        }
    }
}

enum Selection {
    Column(LiveColumn),
    NewColumn,
    Exit,
}

/// Changes an existing table one statement at a time.
pub struct AlterTableWizard<'a, R = ThreadRng> {
    session: &'a SessionContext,
    table: String,
    ddl: Assembler<R>,
}

impl<'a> AlterTableWizard<'a> {
    pub fn new(session: &'a SessionContext, table: impl Into<String>) -> Self {
        Self::with_assembler(session, table, Assembler::new())
    }
}

impl<'a, R: Rng> AlterTableWizard<'a, R> {
    pub fn with_assembler(
        session: &'a SessionContext,
        table: impl Into<String>,
        ddl: Assembler<R>,
    ) -> Self {
        Self {
            session,
            table: table.into(),
            ddl,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Produces the next statement, or `None` once the user exits.
    ///
    /// The executor is only used to read the live columns.
    ///
    /// # Errors
    ///
    /// Introspection failures are returned unchanged, as are console
    /// failures.
    pub fn next_statement<C, E>(
        &mut self,
        console: &mut C,
        executor: &mut E,
    ) -> Result<Option<PendingDdl>>
    where
        C: Console + ?Sized,
        E: QueryExecutor + ?Sized,
    {
        let label = self.session.label(Some(unqualified(&self.table)));
        loop {
            let columns = describe_columns(executor, &self.table)?;
            let column = match select_column(console, &label, &columns)? {
                Selection::Exit => return Ok(None),
                Selection::NewColumn => match self.add_column(console, &label, &columns)? {
                    Some(ddl) => return Ok(Some(ddl)),
                    None => continue,
                },
                Selection::Column(column) => column,
            };

            let operation = select_operation(console, &label, &column)?;
            debug!(table = %self.table, column = %column.name, ?operation, "Alter operation selected");
            let text = match operation {
                AlterOperation::Back => continue,
                AlterOperation::DropColumn => self.ddl.drop_column(&self.table, &column.name),
                AlterOperation::AddForeignKey => self.add_foreign_key(console, &label, &column)?,
                AlterOperation::AddYesNoCheck => {
                    let name = fit_with_notice(
                        console,
                        &mut self.ddl,
                        "check constraint",
                        ConstraintSpec::check_name(unqualified(&self.table), &column.name),
                    );
                    self.ddl
                        .add_check_constraint(&self.table, &name, &yes_no_predicate(&column.name))
                }
                AlterOperation::DropConstraint => {
                    let name = console.ask(&format!("{label} Constraint name: "), true)?;
                    self.ddl.drop_constraint(&self.table, &name)
                }
                AlterOperation::RenameColumn => {
                    let new_name =
                        ask_column_name(console, &format!("{label} New column name: "), |name| {
                            columns.iter().any(|c| c.name.eq_ignore_ascii_case(name))
                        })?;
                    self.ddl.rename_column(&self.table, &column.name, &new_name)
                }
                AlterOperation::ChangeType => {
                    let new_type = ask_replacement_type(console, &label)?;
                    self.ddl.change_column_type(&self.table, &column.name, new_type)
                }
            };
            announce_renames(console, &mut self.ddl);
            return Ok(Some(PendingDdl::new(text)));
        }
    }

    fn add_column<C>(
        &mut self,
        console: &mut C,
        label: &str,
        columns: &[LiveColumn],
    ) -> Result<Option<PendingDdl>>
    where
        C: Console + ?Sized,
    {
        let Some(column_type) = ask_column_type(console, label)? else {
            return Ok(None);
        };
        let table = unqualified(&self.table).to_string();
        let new = ask_new_column(
            console,
            &mut self.ddl,
            label,
            &table,
            column_type,
            |name| columns.iter().any(|c| c.name.eq_ignore_ascii_case(name)),
            |_| false,
        )?;

        let mut extra = Vec::new();
        for constraint in &new.constraints {
            extra.push(match constraint {
                ConstraintSpec::ForeignKey { column, reference } => self.ddl.add_foreign_key(
                    &self.table,
                    column,
                    &reference.external_table,
                    &reference.external_column,
                    &reference.constraint_name,
                ),
                ConstraintSpec::YnCheck {
                    column,
                    constraint_name,
                } => self.ddl.add_check_constraint(
                    &self.table,
                    constraint_name,
                    &yes_no_predicate(column),
                ),
            });
        }
        if let Some(index) = &new.index {
            extra.push(self.ddl.create_index(&self.table, &index.column));
        }

        let text = self.ddl.add_column(&self.table, &new.column, &extra);
        announce_renames(console, &mut self.ddl);
        Ok(Some(PendingDdl::new(text)))
    }

    fn add_foreign_key<C>(&mut self, console: &mut C, label: &str, column: &LiveColumn) -> Result<String>
    where
        C: Console + ?Sized,
    {
        let external_table =
            console.ask(&format!("{label} (FOREIGN KEY) External Table Name: "), true)?;
        let external_column =
            console.ask(&format!("{label} (FOREIGN KEY) External Table Column: "), true)?;
        let link_to_parent =
            console.confirm(&format!("{label} (FOREIGN KEY) Is Link to Parent Column? (Y/N) "))?;

        let name = fit_with_notice(
            console,
            &mut self.ddl,
            "foreign key",
            ForeignKeyRef::default_name(unqualified(&self.table), unqualified(&external_table)),
        );
        let mut text = self.ddl.add_foreign_key(
            &self.table,
            &column.name,
            &external_table,
            &external_column,
            &name,
        );
        if link_to_parent {
            text.push('\n');
            text.push_str(&self.ddl.create_index(&self.table, &column.name));
        }
        Ok(text)
    }
}

fn select_column<C>(console: &mut C, label: &str, columns: &[LiveColumn]) -> Result<Selection>
where
    C: Console + ?Sized,
{
    let mut menu: String = columns
        .iter()
        .map(|c| format!("    {}) {} ({})\n", c.ordinal_position, c.name, c.type_label))
        .collect();
    menu.push_str("    0) Add a new column\n    X) Exit\n");
    console.notify(&format!("{label} Columns:\n{menu}"));

    loop {
        let answer = console.ask(&format!("{label} Select a column: "), true)?;
        if answer.eq_ignore_ascii_case("x") {
            return Ok(Selection::Exit);
        }
        if answer == "0" {
            return Ok(Selection::NewColumn);
        }
        let chosen = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| columns.iter().find(|c| c.ordinal_position == n));
        match chosen {
            Some(column) => return Ok(Selection::Column(column.clone())),
            None => console.notify(
                &ValidationError::InvalidChoice {
                    answer,
                    expected: "a listed column, 0 or X".to_string(),
                }
                .to_string(),
            ),
        }
    }
}

fn select_operation<C>(console: &mut C, label: &str, column: &LiveColumn) -> Result<AlterOperation>
where
    C: Console + ?Sized,
{
    let menu: String = AlterOperation::ALL
        .iter()
        .enumerate()
        .map(|(i, op)| format!("    {}) {}\n", i + 1, op.label()))
        .collect();
    console.notify(&format!("{label} {} ({}):\n{menu}", column.name, column.type_label));

    loop {
        let answer = console.ask(&format!("{label} Operation: "), true)?;
        match AlterOperation::parse_choice(&answer) {
            Some(operation) => return Ok(operation),
            None => console.notify(
                &ValidationError::InvalidChoice {
                    answer,
                    expected: format!("a number from 1 to {}", AlterOperation::ALL.len()),
                }
                .to_string(),
            ),
        }
    }
}

/// Asks whether `table` should really be dropped and returns the statement
/// if so.
pub fn confirm_drop<C>(console: &mut C, table: &str) -> Result<Option<PendingDdl>>
where
    C: Console + ?Sized,
{
    let answer = console.ask(
        &format!("Are you sure you want to drop the table {table}? (Y/N) "),
        true,
    )?;
    if !parse_yes(&answer) {
        return Ok(None);
    }
    Ok(Some(PendingDdl::new(Assembler::new().drop_table(table))))
}

#[cfg(test)]
mod tests {
    use etshell_core::Compressor;
    use etshell_db::{FieldDescriptor, QueryError, QueryResult};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::console::ScriptedConsole;
    use crate::error::WizardError;

    /// Serves a fixed column list and counts what it was asked to do.
    struct Recording {
        fields: Vec<FieldDescriptor>,
        executed: Vec<String>,
        batches: usize,
        fail_with: Option<QueryError>,
    }

    impl Recording {
        fn orders() -> Self {
            let field = |name: &str, type_id, type_modifier, position| FieldDescriptor {
                name: name.to_string(),
                type_id,
                type_modifier,
                ordinal_position: position,
            };
            Self {
                fields: vec![
                    field("tst_orders_id", 1043, 36, 1),
                    field("status", 1043, 64, 2),
                    field("shipped", 1042, 5, 3),
                ],
                executed: Vec::new(),
                batches: 0,
                fail_with: None,
            }
        }
    }

    impl QueryExecutor for Recording {
        fn execute(&mut self, sql: &str) -> etshell_db::Result<QueryResult> {
            self.executed.push(sql.to_string());
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            Ok(QueryResult {
                fields: self.fields.clone(),
                rows: Vec::new(),
            })
        }

        fn execute_batch(&mut self, _sql: &str) -> etshell_db::Result<()> {
            self.batches += 1;
            Ok(())
        }
    }

    fn wizard(session: &SessionContext) -> AlterTableWizard<'_, StdRng> {
        let ddl = Assembler::with_compressor(Compressor::with_rng(StdRng::seed_from_u64(4)));
        AlterTableWizard::with_assembler(session, "tst_orders", ddl)
    }

    fn session() -> SessionContext {
        SessionContext::new("openbravo", "tad")
    }

    #[test]
    fn test_operation_ordinals() {
        assert_eq!(AlterOperation::parse_choice("1"), Some(AlterOperation::DropColumn));
        assert_eq!(AlterOperation::parse_choice(" 7 "), Some(AlterOperation::Back));
        assert_eq!(AlterOperation::parse_choice("0"), None);
        assert_eq!(AlterOperation::parse_choice("8"), None);
    }

    #[test]
    fn test_drop_column_then_exit() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console = ScriptedConsole::new(["2", "1", "X"]);

        let first = wizard.next_statement(&mut console, &mut executor).unwrap();
        assert_eq!(
            first.unwrap().text,
            "ALTER TABLE public.tst_orders DROP COLUMN status;"
        );
        assert_eq!(wizard.next_statement(&mut console, &mut executor).unwrap(), None);

        assert_eq!(executor.executed.len(), 2);
        assert!(executor.executed.iter().all(|sql| sql == "SELECT * FROM tst_orders WHERE false"));
        assert_eq!(executor.batches, 0);
    }

    #[test]
    fn test_back_and_invalid_choices_loop() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console = ScriptedConsole::new(["9", "3", "0", "7", "x"]);

        assert_eq!(wizard.next_statement(&mut console, &mut executor).unwrap(), None);
        // Rejected column 9, rejected operation 0.
        let rejections = console
            .messages()
            .iter()
            .filter(|m| m.contains("is not a valid option"))
            .count();
        assert_eq!(rejections, 2);
        // Going back re-reads the table.
        assert_eq!(executor.executed.len(), 2);
    }

    #[test]
    fn test_add_check_and_change_type() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console = ScriptedConsole::new(["3", "3", "2", "6", "7"]);

        let check = wizard.next_statement(&mut console, &mut executor).unwrap().unwrap();
        assert_eq!(
            check.text,
            "ALTER TABLE public.tst_orders ADD CONSTRAINT tst_orders_shipped_chk CHECK (shipped = 'Y'::bpchar OR shipped = 'N'::bpchar);"
        );
        let change = wizard.next_statement(&mut console, &mut executor).unwrap().unwrap();
        assert_eq!(
            change.text,
            "ALTER TABLE public.tst_orders ALTER COLUMN status TYPE numeric USING status::numeric;"
        );
    }

    #[test]
    fn test_rename_rejects_existing_column() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console = ScriptedConsole::new(["2", "5", "SHIPPED", "docstatus"]);

        let ddl = wizard.next_statement(&mut console, &mut executor).unwrap().unwrap();
        assert_eq!(
            ddl.text,
            "ALTER TABLE public.tst_orders RENAME COLUMN status TO docstatus;"
        );
        assert!(console.messages().iter().any(|m| m.contains("'SHIPPED' already exists")));
    }

    #[test]
    fn test_drop_constraint_uses_name_verbatim() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console = ScriptedConsole::new(["3", "4", "tst_orders_shipped_chk"]);

        let ddl = wizard.next_statement(&mut console, &mut executor).unwrap().unwrap();
        assert_eq!(
            ddl.text,
            "ALTER TABLE public.tst_orders DROP CONSTRAINT tst_orders_shipped_chk;"
        );
    }

    #[test]
    fn test_add_foreign_key_with_index() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console = ScriptedConsole::new(["1", "2", "c_order", "c_order_id", "Y"]);

        let ddl = wizard.next_statement(&mut console, &mut executor).unwrap().unwrap();
        let lines: Vec<_> = ddl.text.lines().collect();
        assert_eq!(
            lines[0],
            "ALTER TABLE public.tst_orders ADD CONSTRAINT tst_orders_c_order FOREIGN KEY (tst_orders_id)"
        );
        assert_eq!(
            *lines.last().unwrap(),
            "CREATE INDEX tst_orders_tst_orders_id_idx ON public.tst_orders (tst_orders_id);"
        );
    }

    #[test]
    fn test_new_column_from_alter() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console =
            ScriptedConsole::new(["0", "2", "status", "isprocessed", "Y", "'N'", "N", "Y"]);

        let ddl = wizard.next_statement(&mut console, &mut executor).unwrap().unwrap();
        assert_eq!(
            ddl.text,
            "ALTER TABLE public.tst_orders ADD COLUMN isprocessed character (1) NOT NULL DEFAULT 'N';\n\
             ALTER TABLE public.tst_orders ADD CONSTRAINT tst_orders_isprocessed_chk CHECK (isprocessed = 'Y'::bpchar OR isprocessed = 'N'::bpchar);"
        );
        assert!(console.messages().iter().any(|m| m.contains("'status' already exists")));
        assert_eq!(executor.batches, 0);
    }

    #[test]
    fn test_stop_ordinal_returns_to_columns() {
        let session = session();
        let mut wizard = wizard(&session);
        let mut executor = Recording::orders();
        let mut console = ScriptedConsole::new(["0", "10", "X"]);
        assert_eq!(wizard.next_statement(&mut console, &mut executor).unwrap(), None);
        assert_eq!(executor.executed.len(), 2);
    }

    #[test]
    fn test_introspection_error_ends_wizard() {
        let session = session();
        let mut wizard = wizard(&session);
        let expected = QueryError::Rejected {
            code: Some("42P01".into()),
            message: "relation \"tst_orders\" does not exist".into(),
        };
        let mut executor = Recording {
            fail_with: Some(expected.clone()),
            ..Recording::orders()
        };
        let mut console = ScriptedConsole::new(["X"]);

        let err = wizard.next_statement(&mut console, &mut executor).unwrap_err();
        assert_eq!(err, WizardError::Query(expected));
        assert_eq!(console.prompts().len(), 0);
    }

    #[test]
    fn test_confirm_drop() {
        let mut console = ScriptedConsole::new(["Y", "n"]);
        let ddl = confirm_drop(&mut console, "tst_orders").unwrap().unwrap();
        assert_eq!(ddl.text, "DROP TABLE public.tst_orders;");
        assert_eq!(confirm_drop(&mut console, "tst_orders").unwrap(), None);
    }
}
