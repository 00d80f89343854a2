//! Core error types for the Pennywise engine.
//!
//! This module defines storage-agnostic error types. Store-specific errors
//! are converted to these types by the storage layer.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
///
/// Every error is returned to the immediate caller. Nothing in core retries
/// or swallows them; retry policy belongs to the store collaborator.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Credit operation failed: {0}")]
    Credit(#[from] CreditError),

    #[error("Goal operation failed: {0}")]
    Goal(#[from] GoalError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by the credit engine and card operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreditError {
    /// The charge exceeds what is left on the card. Recoverable by the user.
    #[error("Insufficient credit limit: {available} available")]
    InsufficientLimit { available: Decimal },

    /// Installment counts start at one. Callers must clamp before planning.
    #[error("Invalid installment count: {0}")]
    InvalidInstallmentCount(u32),

    #[error("Card not found: {0}")]
    CardNotFound(String),
}

/// Errors raised by goal operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GoalError {
    #[error("Goal not found: {0}")]
    GoalNotFound(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl Error {
    /// Returns the credit error carried by this error, if any.
    pub fn as_credit(&self) -> Option<&CreditError> {
        match self {
            Error::Credit(e) => Some(e),
            _ => None,
        }
    }

    /// True for failures a user can correct (bad amount, not enough limit,
    /// missing entity), false for programmer or infrastructure errors.
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            Error::Credit(CreditError::InvalidInstallmentCount(_)) => false,
            Error::Credit(_) | Error::Goal(_) | Error::Validation(_) => true,
            _ => false,
        }
    }
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
