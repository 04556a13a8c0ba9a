//! Error types for Stratus.

use thiserror::Error;

/// Common error type for Stratus.
#[derive(Error, Debug)]
pub enum StratusError {
    /// Database error.
    ///
    /// This is a generic database error that wraps errors from any database backend.
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A stored hierarchy invariant does not hold (e.g. a cycle in the
    /// folder parent chain). Operations that detect this stop before
    /// mutating anything.
    #[error("hierarchy invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for StratusError {
    fn from(e: sqlx::Error) -> Self {
        StratusError::Database(e.to_string())
    }
}

/// Result type alias for Stratus operations.
pub type Result<T> = std::result::Result<T, StratusError>;
