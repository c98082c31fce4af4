//! The create-table wizard.
//!
//! Asks for a table prefix and name, then collects columns until the stop
//! ordinal, and hands back the complete `CREATE TABLE` script.

use etshell_core::{SessionContext, TableSpec, ValidationError, validate_identifier};
use etshell_ddl::Assembler;
use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::{debug, info};

use crate::columns::{announce_renames, ask_column_type, ask_new_column};
use crate::console::Console;
use crate::error::Result;
use crate::pending::PendingDdl;

/// Builds a new table from the user's answers.
///
/// # Examples
///
/// ```
/// use etshell_core::SessionContext;
/// use etshell_wizard::{CreateTableWizard, ScriptedConsole};
///
/// let session = SessionContext::new("openbravo", "tad");
/// let mut console = ScriptedConsole::new(["tst", "orders", "10"]);
///
/// let ddl = CreateTableWizard::new(&session).run(&mut console).unwrap();
/// assert!(ddl.text.starts_with("CREATE TABLE public.tst_orders"));
/// ```
#[derive(Debug)]
pub struct CreateTableWizard<'a, R = ThreadRng> {
    session: &'a SessionContext,
    ddl: Assembler<R>,
}

impl<'a> CreateTableWizard<'a> {
    pub fn new(session: &'a SessionContext) -> Self {
        Self::with_assembler(session, Assembler::new())
    }
}

impl<'a, R: Rng> CreateTableWizard<'a, R> {
    /// Uses `ddl` for assembly, e.g. one with a seeded compressor.
    pub fn with_assembler(session: &'a SessionContext, ddl: Assembler<R>) -> Self {
        Self { session, ddl }
    }

    /// Runs the wizard to completion.
    ///
    /// # Errors
    ///
    /// Fails only if the console does; the partial table is discarded.
    pub fn run<C>(mut self, console: &mut C) -> Result<PendingDdl>
    where
        C: Console + ?Sized,
    {
        let full_name = self.name_table(console)?;
        let mut spec = TableSpec::new(full_name).with_owner(&self.session.db_user);
        self.collect_columns(console, &mut spec)?;

        let text = self.ddl.create_table(&spec);
        announce_renames(console, &mut self.ddl);
        info!(
            table = %spec.full_name,
            columns = spec.columns().len(),
            "Create table wizard finished"
        );
        Ok(PendingDdl::new(text))
    }

    fn name_table<C>(&mut self, console: &mut C) -> Result<String>
    where
        C: Console + ?Sized,
    {
        let label = self.session.label(None);
        loop {
            let prefix = console.ask(&format!("{label} Insert table prefix: "), true)?;
            let name = console.ask(&format!("{label} Insert table name: "), true)?;
            let full_name = format!("{prefix}_{name}");

            if let Err(err) = validate_identifier(&full_name) {
                console.notify(&err.to_string());
                continue;
            }

            let compressor = self.ddl.compressor();
            if compressor.fits(&full_name) {
                return Ok(full_name);
            }

            console.notify(&format!(
                "The table name {full_name} is longer than {} characters. It can be shortened, or you can name the table again.",
                compressor.limit()
            ));
            if ask_retry_or_continue(console)? == NamingChoice::Continue {
                let short = self.ddl.compressor().shorten(&full_name);
                console.notify(&format!("The table will be created as {short}."));
                return Ok(short);
            }
            debug!(table = %full_name, "Retrying table naming");
        }
    }

    fn collect_columns<C>(&mut self, console: &mut C, spec: &mut TableSpec) -> Result<()>
    where
        C: Console + ?Sized,
    {
        let label = self.session.label(Some(&spec.full_name));
        while let Some(column_type) = ask_column_type(console, &label)? {
            let new = ask_new_column(
                console,
                &mut self.ddl,
                &label,
                &spec.full_name,
                column_type,
                |name| spec.has_column(name),
                |name| spec.has_constraint(name),
            )?;

            let column_name = new.column.name.clone();
            if let Err(err) = spec.add_column_with_constraints(new.column, new.constraints) {
                console.notify(&format!("{err}. The column {column_name} was not added."));
                continue;
            }
            if let Some(index) = new.index {
                spec.add_index(index);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamingChoice {
    Retry,
    Continue,
}

/// Asks `R` or `C` (either case) until one of them is given.
fn ask_retry_or_continue<C>(console: &mut C) -> Result<NamingChoice>
where
    C: Console + ?Sized,
{
    loop {
        let answer = console.ask("(R: Retry, C: Continue) ", true)?;
        if answer.eq_ignore_ascii_case("r") {
            return Ok(NamingChoice::Retry);
        }
        if answer.eq_ignore_ascii_case("c") {
            return Ok(NamingChoice::Continue);
        }
        console.notify(
            &ValidationError::InvalidChoice {
                answer,
                expected: "R to retry or C to continue".to_string(),
            }
            .to_string(),
        );
    }
}
