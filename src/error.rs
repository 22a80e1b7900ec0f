//! Custom error types for bankstore
//!
//! This module defines the error hierarchy for the store using thiserror
//! for ergonomic error definitions. Expected business outcomes such as
//! insufficient funds are not errors; they are reported through booleans
//! or outcome enums by the account and transaction types.

use thiserror::Error;

/// The main error type for bankstore operations
#[derive(Error, Debug)]
pub enum BankError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid input rejected at construction time
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// A persisted record could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Password did not match
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Persistence errors (a data file could not be written or replaced)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BankError {
    /// Create a "not found" error for customers
    pub fn customer_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Customer",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the persistence layer
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }
}

impl From<std::io::Error> for BankError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BankError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for bankstore operations
pub type BankResult<T> = Result<T, BankError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BankError::Validation("Amount must be positive".into());
        assert_eq!(err.to_string(), "Validation error: Amount must be positive");
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_error() {
        let err = BankError::account_not_found("10004");
        assert_eq!(err.to_string(), "Account not found: 10004");
        assert!(err.is_not_found());

        let err = BankError::customer_not_found("1000");
        assert_eq!(err.to_string(), "Customer not found: 1000");
    }

    #[test]
    fn test_duplicate_error() {
        let err = BankError::Duplicate {
            entity_type: "Username",
            identifier: "alice".into(),
        };
        assert_eq!(err.to_string(), "Username already exists: alice");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let bank_err: BankError = io_err.into();
        assert!(matches!(bank_err, BankError::Io(_)));
        assert!(bank_err.is_storage());
    }
}
