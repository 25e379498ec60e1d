//! Numbering error types.

use madrasah_shared::AppError;
use thiserror::Error;

/// Identifier numbering errors.
#[derive(Debug, Error)]
pub enum NumberingError {
    /// The generated identifier was taken by a concurrent writer.
    #[error("Identifier already taken: {0}")]
    Conflict(String),

    /// The counter for a scope cannot be incremented further.
    #[error("Counter exhausted for scope {0}")]
    CounterOverflow(String),

    /// Unknown identifier kind.
    #[error("Unknown identifier kind: {0}")]
    UnknownKind(String),

    /// Persistence failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl NumberingError {
    /// Creates a repository error from any displayable error.
    #[must_use]
    pub fn repository(err: impl std::fmt::Display) -> Self {
        Self::Repository(err.to_string())
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "IDENTIFIER_CONFLICT",
            Self::CounterOverflow(_) => "COUNTER_OVERFLOW",
            Self::UnknownKind(_) => "UNKNOWN_IDENTIFIER_KIND",
            Self::Repository(_) => "REPOSITORY_ERROR",
        }
    }

    /// Returns true if generating a fresh identifier may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<NumberingError> for AppError {
    fn from(err: NumberingError) -> Self {
        match err {
            NumberingError::Conflict(_) => Self::Conflict(err.to_string()),
            NumberingError::UnknownKind(_) => Self::Validation(err.to_string()),
            NumberingError::CounterOverflow(_) => Self::BusinessRule(err.to_string()),
            NumberingError::Repository(_) => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_conflicts_are_retryable() {
        assert!(NumberingError::Conflict("STU-25-001".into()).is_retryable());
        assert!(!NumberingError::CounterOverflow("STU-25-".into()).is_retryable());
        assert!(!NumberingError::repository("boom").is_retryable());
    }

    #[test]
    fn test_conversion_to_app_error() {
        let app: AppError = NumberingError::Conflict("INV-2025-T1-0001".into()).into();
        assert_eq!(app.status_code(), 409);

        let app: AppError = NumberingError::UnknownKind("teacher".into()).into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
