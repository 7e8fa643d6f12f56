//! Error types for store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or using a user store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing database could not be reached.
    #[error("database unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    /// Failed to read from file system.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to file system.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored data is not valid JSON or has the wrong shape.
    #[error("malformed database {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize data to JSON.
    #[error("failed to serialize: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Requested table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
