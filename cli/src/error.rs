//! Error type for the shell and its commands.
//!
//! Every command failure ends up here and is printed by the read loop,
//! which then carries on with the next command.

use etshell_core::ValidationError;
use etshell_db::{ConfigError, QueryError};
use etshell_wizard::{ConsoleError, WizardError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Invalid command. Try :help to check all commands available.")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("command {0} is registered twice")]
    DuplicateCommand(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error(transparent)]
    Wizard(#[from] WizardError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Whether the user abandoned a question with Ctrl-C or Ctrl-D.
    pub fn is_cancelled(&self) -> bool {
        match self {
            ShellError::Console(ConsoleError::Cancelled) => true,
            ShellError::Wizard(err) => err.is_cancelled(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
