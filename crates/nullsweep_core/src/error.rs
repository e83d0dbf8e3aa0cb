//! Error types.

use nullsweep_ast::EditError;
use nullsweep_parser::ParseError;
use thiserror::Error;

/// Errors that can occur while applying a code fix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    /// The host cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// An edit could not be recorded.
    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    /// The provider does not know the requested action.
    #[error("Unsupported code action: {0}")]
    UnsupportedAction(String),
}

impl FixError {
    /// Creates an unsupported action error.
    pub fn unsupported_action(key: impl Into<String>) -> Self {
        Self::UnsupportedAction(key.into())
    }
}

/// Errors surfaced to the host.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Fix error.
    #[error("Fix error: {0}")]
    Fix(#[from] FixError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fix_error_from_edit_error() {
        let err: FixError = EditError::AlreadyReplaced(3).into();
        assert!(matches!(err, FixError::Edit(EditError::AlreadyReplaced(3))));
        assert_eq!(err.to_string(), "Edit error: Node 3 already has a pending replacement");
    }

    #[test]
    fn test_core_error_display() {
        let err = CoreError::config("bad glob");
        assert_eq!(err.to_string(), "Configuration error: bad glob");

        let err: CoreError = FixError::Cancelled.into();
        assert_eq!(err.to_string(), "Fix error: Operation cancelled");
    }
}
