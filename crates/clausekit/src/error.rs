//! Error types for clausekit

use thiserror::Error;

/// Result type alias for clausekit operations
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Error types for query composition and hand-off
#[derive(Debug, Error)]
pub enum BuilderError {
    /// A required collaborator was not supplied
    #[error("Missing argument: `{name}` must be provided")]
    Argument { name: &'static str },

    /// The clause protocol was violated (mismatched start/end, open clause at render, ...)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl BuilderError {
    /// Create an argument error naming the missing parameter
    pub fn argument(name: &'static str) -> Self {
        Self::Argument { name }
    }

    /// Create an invalid operation error
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is an argument error
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument { .. })
    }

    /// Name of the missing parameter, for argument errors
    pub fn argument_name(&self) -> Option<&'static str> {
        match self {
            Self::Argument { name } => Some(*name),
            _ => None,
        }
    }

    /// Check if this is a protocol violation
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Wrap a tokio_postgres error
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        Self::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_error_names_parameter() {
        let err = BuilderError::argument("builder");
        assert!(err.is_argument());
        assert_eq!(err.argument_name(), Some("builder"));
        assert_eq!(err.to_string(), "Missing argument: `builder` must be provided");
    }

    #[test]
    fn invalid_operation_message() {
        let err = BuilderError::invalid_operation("no clause is open");
        assert!(err.is_invalid_operation());
        assert!(!err.is_not_found());
        assert_eq!(err.argument_name(), None);
        assert_eq!(err.to_string(), "Invalid operation: no clause is open");
    }
}
