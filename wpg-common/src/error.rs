//! Common error types for WPG

use thiserror::Error;

/// Common result type for WPG operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the WPG crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Comma-delimited log could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Delete requested for a row that does not exist
    #[error("Row index {index} out of range (log has {len} rows)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Backing store refused the write; previous content is intact
    #[error("Save failed: {0}")]
    Persistence(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
