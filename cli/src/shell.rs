//! The interactive shell: session state, the read loop and the built-in
//! commands.
//!
//! Generated DDL never runs on its own. Every statement a wizard hands back
//! goes through [`Shell::deliver`], which asks whether to print, execute or
//! save it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use colored::Colorize;
use etshell_core::{SessionContext, validate_identifier};
use etshell_db::{QueryExecutor, ShellConfig, save_query, save_query_in};
use etshell_wizard::{
    AlterTableWizard, Console, ConsoleError, CreateTableWizard, PendingDdl, confirm_drop,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::error::{Result, ShellError};
use crate::formatter::format_table;
use crate::gate::{OutputChoice, ask_output_choice};
use crate::registry::{CommandRegistry, Registry};

/// Builds an executor for the given settings.
pub type Connect = Box<dyn Fn(&ShellConfig) -> Box<dyn QueryExecutor>>;

const CONNECTION_CHECK: &str = "SELECT NOW()";

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub struct Shell<C> {
    config: ShellConfig,
    config_path: PathBuf,
    console: C,
    executor: Box<dyn QueryExecutor>,
    connect: Connect,
    save_dir: PathBuf,
    active: bool,
}

impl<C: Console> Shell<C> {
    pub fn new(
        config: ShellConfig,
        config_path: impl Into<PathBuf>,
        console: C,
        connect: Connect,
    ) -> Self {
        let executor = connect(&config);
        Self {
            config,
            config_path: config_path.into(),
            console,
            executor,
            connect,
            save_dir: PathBuf::from("."),
            active: true,
        }
    }

    /// Directory for scripts saved from the output prompt.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `[<user>@<pivot>] `
    pub fn prompt(&self) -> String {
        format!("[{}@{}] ", self.config.db_user, self.config.pivot)
    }

    fn session(&self) -> SessionContext {
        SessionContext::new(&self.config.pivot, &self.config.db_user)
    }

    /// Runs the connection check and reports the outcome.
    pub fn check_connection(&mut self) -> bool {
        let pb = spinner(format!("Connecting to {}...", self.session().target()));
        let outcome = self.executor.execute(CONNECTION_CHECK);
        pb.finish_and_clear();
        match outcome {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "Connection check failed");
                false
            }
        }
    }

    /// Reads and runs commands until `:exit` or end of input.
    pub fn run(&mut self, registry: &Registry<Self>) {
        if !self.check_connection() {
            self.console.notify(
                &"Pool can not be initialized. Please, use :db to set the correct database credentials."
                    .yellow()
                    .to_string(),
            );
        }
        while self.is_active() {
            let prompt = self.prompt();
            let line = match self.console.read_line(&prompt) {
                Ok(line) => line,
                Err(ConsoleError::Cancelled) => break,
                Err(err) => {
                    self.report(&err.into());
                    break;
                }
            };
            self.handle_line(registry, &line);
        }
        debug!("Shell loop finished");
    }

    /// Runs one command line, reporting any failure.
    pub fn handle_line(&mut self, registry: &Registry<Self>, line: &str) {
        if let Err(err) = registry.dispatch(self, line) {
            self.report(&err);
        }
    }

    fn report(&mut self, err: &ShellError) {
        if err.is_cancelled() {
            self.console.notify(&"cancelled".yellow().to_string());
        } else {
            debug!(error = %err, "Command failed");
            self.console.notify(&format!("✗ {err}").red().to_string());
        }
    }

    /// Asks what to do with `ddl` and does it.
    pub fn deliver(&mut self, ddl: PendingDdl) -> Result<()> {
        let target = self.session().target();
        match ask_output_choice(&mut self.console, &target)? {
            OutputChoice::Print => self.console.notify(ddl.as_str()),
            OutputChoice::Execute => {
                let pb = spinner(format!("Executing query in {target}..."));
                let outcome = self.executor.execute_batch(ddl.as_str());
                pb.finish_and_clear();
                outcome?;
                info!(target = %target, "Executed generated DDL");
                self.console
                    .notify(&"Query executed successfully!".green().to_string());
            }
            OutputChoice::Save => {
                let name = self
                    .console
                    .ask("File name (leave empty to generate one): ", false)?;
                let pb = spinner("Saving file...".to_string());
                let saved = if name.is_empty() {
                    save_query_in(&self.save_dir, ddl.as_str())
                } else {
                    save_query(Some(&self.save_dir.join(Path::new(&name))), ddl.as_str())
                };
                pb.finish_and_clear();
                let path = saved?;
                self.console
                    .notify(&format!("Query saved to file: {}", path.display()));
            }
        }
        Ok(())
    }

    fn reconnect(&mut self) {
        self.executor = (self.connect)(&self.config);
    }
}

/// Registers the built-in commands.
pub fn build_registry<C: Console>() -> Result<Registry<Shell<C>>> {
    let mut commands: CommandRegistry<Shell<C>> = CommandRegistry::new();
    commands
        .register(":help", ":help", "Lists the available commands.", help::<C>)?
        .register(":exit", ":exit", "Closes the shell.", exit::<C>)?
        .register(
            ":pivot",
            ":pivot <database>",
            "Switches the active database.",
            pivot::<C>,
        )?
        .register(
            ":db",
            ":db <user|pwd|host|port|db> <value>",
            "Changes one database setting, checks it and saves the configuration.",
            db::<C>,
        )?
        .register(
            ":query",
            ":query <sql…>",
            "Executes a query directly in the database.",
            query::<C>,
        )?
        .register(
            ":table",
            ":table create | alter <table> | drop <table>",
            "Creates, alters or drops tables.",
            table::<C>,
        )?;
    Ok(commands.freeze())
}

fn help<C: Console>(shell: &mut Shell<C>, registry: &Registry<Shell<C>>, _: &[&str]) -> Result<()> {
    for command in registry.commands() {
        let usage = format!("{:<46}", command.usage);
        shell
            .console
            .notify(&format!("{} {}", usage.cyan(), command.description));
    }
    Ok(())
}

fn exit<C: Console>(shell: &mut Shell<C>, _: &Registry<Shell<C>>, _: &[&str]) -> Result<()> {
    shell.active = false;
    shell.console.notify("Bye!");
    Ok(())
}

fn pivot<C: Console>(shell: &mut Shell<C>, _: &Registry<Shell<C>>, args: &[&str]) -> Result<()> {
    let [name] = args else {
        return Err(ShellError::Usage(":pivot <database>"));
    };
    validate_identifier(name)?;
    shell.config.pivot = name.to_string();
    shell.reconnect();
    info!(pivot = *name, "Pivot changed");
    shell.console.notify(&format!("Pivot set to {name}."));
    Ok(())
}

fn db<C: Console>(shell: &mut Shell<C>, _: &Registry<Shell<C>>, args: &[&str]) -> Result<()> {
    let [key, value @ ..] = args else {
        return Err(ShellError::Usage(":db <user|pwd|host|port|db> <value>"));
    };
    if value.is_empty() {
        return Err(ShellError::Usage(":db <user|pwd|host|port|db> <value>"));
    }
    let value = value.join(" ");

    let previous = shell.config.clone();
    if let Err(err) = shell.config.set(key, &value) {
        shell.console.notify(&err.to_string());
        return Ok(());
    }
    let shown = if *key == "pwd" { "****" } else { value.as_str() };
    shell.console.notify(&format!("Property {key} set to {shown}."));

    shell.reconnect();
    if !shell.check_connection() {
        shell.config = previous;
        shell.reconnect();
        shell.console.notify(
            &"Can't connect with the provided information. The previous value has been restored."
                .yellow()
                .to_string(),
        );
        return Ok(());
    }

    shell.config.save(&shell.config_path)?;
    shell.console.notify(
        &format!("Connected to {}. Configuration saved.", shell.session().target())
            .green()
            .to_string(),
    );
    Ok(())
}

fn query<C: Console>(shell: &mut Shell<C>, _: &Registry<Shell<C>>, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        return Err(ShellError::Usage(":query <sql…>"));
    }
    let sql = args.join(" ");
    let pb = spinner("Executing query...".to_string());
    let outcome = shell.executor.execute(&sql);
    pb.finish_and_clear();
    let result = outcome?;
    info!(rows = result.rows.len(), "Query executed");
    shell.console.notify(&format_table(&result));
    Ok(())
}

fn table<C: Console>(shell: &mut Shell<C>, _: &Registry<Shell<C>>, args: &[&str]) -> Result<()> {
    const USAGE: &str = ":table create | alter <table> | drop <table>";
    let session = shell.session();
    match args {
        ["create"] => {
            let ddl = CreateTableWizard::new(&session).run(&mut shell.console)?;
            shell.deliver(ddl)
        }
        ["alter", name] => {
            let mut wizard = AlterTableWizard::new(&session, *name);
            while let Some(ddl) = wizard.next_statement(&mut shell.console, shell.executor.as_mut())? {
                if let Err(err) = shell.deliver(ddl) {
                    if err.is_cancelled() {
                        return Err(err);
                    }
                    shell.report(&err);
                }
            }
            Ok(())
        }
        ["drop", name] => match confirm_drop(&mut shell.console, name)? {
            Some(ddl) => shell.deliver(ddl),
            None => {
                shell.console.notify(&format!("The table {name} was left in place."));
                Ok(())
            }
        },
        _ => Err(ShellError::Usage(USAGE)),
    }
}
