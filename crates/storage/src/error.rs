//! Storage error types

use thiserror::Error;

/// Errors that can occur during record store operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record or file contents could not be encoded/decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),
}
