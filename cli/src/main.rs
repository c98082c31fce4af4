mod console;
mod error;
mod formatter;
mod gate;
mod logging;
mod registry;
mod shell;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use etshell_db::{ConnectionSettings, DEFAULT_CONFIG_PATH, PgExecutor, QueryExecutor, ShellConfig};
use tracing::info;

use crate::console::TerminalConsole;
use crate::error::Result;
use crate::logging::init_logging;
use crate::shell::{Connect, Shell, build_registry};

#[derive(Debug, Parser)]
#[command(name = "etshell", version)]
#[command(about = "Interactive schema administration for Etendo databases")]
struct Cli {
    /// Connection settings file; created with defaults if missing.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Directory where generated scripts are saved.
    #[arg(long, default_value = ".")]
    save_dir: PathBuf,
    /// Log filter (e.g. `debug`, `etshell_wizard=trace`). Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    if let Err(err) = run(cli) {
        eprintln!("{}", format!("error: {err}").red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ShellConfig::load_or_create(&cli.config)?;
    info!(config = %cli.config.display(), pivot = %config.pivot, "Starting shell");

    let console = TerminalConsole::new()?;
    let connect: Connect = Box::new(|config: &ShellConfig| {
        Box::new(PgExecutor::new(ConnectionSettings::from(config))) as Box<dyn QueryExecutor>
    });
    let registry = build_registry::<TerminalConsole>()?;

    let mut shell = Shell::new(config, cli.config, console, connect).with_save_dir(cli.save_dir);
    shell.run(&registry);
    Ok(())
}
