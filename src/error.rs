//! Error types for schemashift.
//!
//! Rendering SQL never fails. These errors come from the outer layers:
//! keyword parsing, plan and config loading, and revert script assembly.

use thiserror::Error;

/// The main error type for schemashift operations.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// A type or action keyword could not be parsed.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// A field declared as primary key also asked for column options.
    #[error("Conflicting options on field '{field}': {reason}")]
    ConflictingField { field: String, reason: &'static str },

    /// A change without a revert query was found while building a revert script.
    #[error("Change #{index} cannot be reverted: {statement}")]
    Irreversible { index: usize, statement: String },

    /// Plan file could not be deserialized.
    #[error("Plan error: {0}")]
    Plan(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShiftError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a conflicting field error.
    pub fn conflicting(field: impl Into<String>, reason: &'static str) -> Self {
        Self::ConflictingField {
            field: field.into(),
            reason,
        }
    }
}

/// Result type alias for schemashift operations.
pub type ShiftResult<T> = Result<T, ShiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShiftError::parse(7, "expected ')'");
        assert_eq!(err.to_string(), "Parse error at position 7: expected ')'");
    }

    #[test]
    fn test_irreversible_display() {
        let err = ShiftError::Irreversible {
            index: 2,
            statement: "INSERT INTO logs VALUES (1)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Change #2 cannot be reverted: INSERT INTO logs VALUES (1)"
        );
    }
}
