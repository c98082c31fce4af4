//! Error types for database access and configuration persistence.
//!
//! [`QueryError`] is what every [`QueryExecutor`](crate::QueryExecutor)
//! returns; it is cloneable so callers can report it and still hand it on.
//! [`ConfigError`] covers reading and writing the configuration file.

use thiserror::Error;

/// Failure reported by a query executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The server could not be reached or the session broke down.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server refused the statement.
    #[error("{}", rejected_message(.code.as_deref(), .message))]
    Rejected {
        /// SQLSTATE code, when the server sent one.
        code: Option<String>,
        /// Server-side error message.
        message: String,
    },
}

fn rejected_message(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) => format!("query rejected ({code}): {message}"),
        None => format!("query rejected: {message}"),
    }
}

impl QueryError {
    /// Convenience constructor for a rejection without a SQLSTATE.
    pub fn rejected(message: impl Into<String>) -> Self {
        QueryError::Rejected {
            code: None,
            message: message.into(),
        }
    }
}

impl From<postgres::Error> for QueryError {
    fn from(err: postgres::Error) -> Self {
        match err.as_db_error() {
            Some(db) => QueryError::Rejected {
                code: Some(db.code().code().to_string()),
                message: db.message().to_string(),
            },
            None => QueryError::Connection(err.to_string()),
        }
    }
}

/// Errors while loading or saving the shell configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A setting key outside [`ShellConfig::KEYS`](crate::ShellConfig::KEYS).
    #[error("Invalid property identifier. Use one of these: user, pwd, host, port, db")]
    UnknownKey(String),

    /// A value that does not parse for its key.
    #[error("'{value}' is not a valid {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Convenience alias for results with [`QueryError`].
pub type Result<T> = std::result::Result<T, QueryError>;
