//! Error types for revdash.

use thiserror::Error;

/// Common error type for revdash.
#[derive(Error, Debug)]
pub enum RevdashError {
    /// Database error.
    ///
    /// Raised when the message store cannot be reached or a read/write fails.
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for request input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Upstream API (report or comment service) failed or was unreachable.
    #[error("external service error: {0}")]
    ExternalService(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for RevdashError {
    fn from(e: sqlx::Error) -> Self {
        RevdashError::Database(e.to_string())
    }
}

impl From<reqwest::Error> for RevdashError {
    fn from(e: reqwest::Error) -> Self {
        RevdashError::ExternalService(e.to_string())
    }
}

/// Result type alias for revdash operations.
pub type Result<T> = std::result::Result<T, RevdashError>;
