//! Error types for anonboard.

use thiserror::Error;

/// Common error type for anonboard.
#[derive(Error, Debug)]
pub enum BoardError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Password hashing or verification failed internally.
    #[error("password hashing error: {0}")]
    Hashing(String),

    /// A store or hashing call did not finish in time.
    #[error("{0} timed out")]
    Timeout(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for BoardError {
    fn from(e: sqlx::Error) -> Self {
        BoardError::Database(e.to_string())
    }
}

/// Result type alias for anonboard operations.
pub type Result<T> = std::result::Result<T, BoardError>;
