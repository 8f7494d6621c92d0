//! Common error types for the sentiment analyzer

use thiserror::Error;

/// Common result type for sentiment analyzer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the service
#[derive(Error, Debug)]
pub enum Error {
    /// Record could not be persisted or read back (wraps sqlx::Error)
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] sqlx::Error),

    /// Polarity scoring primitive could not produce a score
    #[error("Scoring unavailable: {0}")]
    ScoringUnavailable(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists (e.g. duplicate username)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored data could not be decoded into a domain value
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True when the error originates from the storage layer
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::StorageFailure(_))
    }
}
