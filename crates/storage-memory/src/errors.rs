//! Storage-specific error types.
//!
//! These errors are internal to the storage layer and are converted to
//! `pennywise_core::Error` before being returned to callers.

use pennywise_core::errors::{Error, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Table lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Writer actor is not running")]
    WriterClosed,

    #[error("Writer actor returned an unexpected result type")]
    UnexpectedResult,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl<T> From<std::sync::PoisonError<T>> for StorageError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        StorageError::LockPoisoned(err.to_string())
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Serialization(e) => {
                Error::Validation(ValidationError::InvalidInput(e.to_string()))
            }
            StorageError::AlreadyExists { .. } => {
                Error::Validation(ValidationError::InvalidInput(err.to_string()))
            }
            StorageError::UnexpectedResult => Error::Unexpected(err.to_string()),
            other => Error::Repository(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_repository_error() {
        let err: Error = StorageError::NotFound {
            entity: "Subscription",
            id: "s1".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Repository(ref msg) if msg == "Subscription not found: s1"));
    }

    #[test]
    fn test_already_exists_is_user_recoverable() {
        let err: Error = StorageError::AlreadyExists {
            entity: "Transaction",
            id: "t1".to_string(),
        }
        .into();
        assert!(err.is_user_recoverable());
        assert_eq!(
            err.to_string(),
            "Input validation failed: Invalid input: Transaction already exists: t1"
        );
    }

    #[test]
    fn test_serialization_maps_to_validation_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = StorageError::from(parse_err).into();
        assert!(matches!(err, Error::Validation(_)));
    }
}
