//! Error types for the wizards and their console.

use etshell_db::QueryError;
use thiserror::Error;

/// Failure to obtain an answer from the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    /// End of input or interrupt while a question was pending.
    #[error("input cancelled")]
    Cancelled,

    /// The terminal could not be read.
    #[error("console error: {0}")]
    Io(String),
}

/// Errors that end a wizard run.
///
/// Validation problems never show up here: they are reported to the user
/// and the question is asked again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl WizardError {
    /// Whether the user walked away from the wizard.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WizardError::Console(ConsoleError::Cancelled))
    }
}

/// Convenience alias for results with [`WizardError`].
pub type Result<T> = std::result::Result<T, WizardError>;
