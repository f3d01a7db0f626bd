//! Common error types for showlog

use thiserror::Error;

/// Common result type for showlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the record store, configuration loader and server
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input (missing required field, malformed date, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
