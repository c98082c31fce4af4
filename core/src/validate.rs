//! Identifier and answer validation.
//!
//! Every name the wizard collects goes through these checks before it is
//! used in a specification. Failures are recoverable: callers report the
//! [`ValidationError`] message and ask the same question again.
//!
//! # Examples
//!
//! ```
//! use etshell_core::{ValidationError, validate_identifier};
//!
//! assert!(validate_identifier("c_orderline").is_ok());
//! assert!(matches!(
//!     validate_identifier("order line"),
//!     Err(ValidationError::InvalidIdentifier(_))
//! ));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::compress::IDENTIFIER_LIMIT;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile")
});

/// Recoverable validation failures.
///
/// The `Display` impl says what was wrong and what is expected, so it can be
/// shown to the user as-is before re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required answer was empty or whitespace-only.
    #[error("a value is required")]
    Empty,
    /// Identifier exceeds the length limit.
    #[error("'{name}' has {len} characters; the maximum is {limit}")]
    TooLong {
        /// The rejected identifier.
        name: String,
        /// Its length in characters.
        len: usize,
        /// The limit it exceeded.
        limit: usize,
    },
    /// Identifier contains characters outside `[A-Za-z0-9_]` or starts with a digit.
    #[error("'{0}' is not a valid identifier: use letters, digits and underscores, not starting with a digit")]
    InvalidIdentifier(String),
    /// A column with the same name was already added.
    #[error("column '{0}' already exists in this table")]
    DuplicateColumn(String),
    /// A constraint with the same name was already added.
    #[error("constraint '{0}' already exists in this table")]
    DuplicateConstraint(String),
    /// An answer did not match any offered option.
    #[error("'{answer}' is not a valid option; expected {expected}")]
    InvalidChoice {
        /// The rejected answer.
        answer: String,
        /// Human description of the accepted answers.
        expected: String,
    },
}

/// Validates identifier syntax without a length check.
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if !IDENTIFIER_RE.is_match(name) {
        return Err(ValidationError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Validates a user-supplied name that is never compressed (column names).
///
/// The name must be a valid identifier of at most [`IDENTIFIER_LIMIT`]
/// characters.
pub fn validate_column_name(name: &str) -> Result<(), ValidationError> {
    validate_identifier(name)?;
    let len = name.chars().count();
    if len > IDENTIFIER_LIMIT {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            len,
            limit: IDENTIFIER_LIMIT,
        });
    }
    Ok(())
}

/// Parses a `Y`/`N` answer. Anything other than `Y` (any case) is `false`.
pub fn parse_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
