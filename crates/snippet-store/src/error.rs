//! Error types for the storage layer.

use thiserror::Error;

/// Errors that can occur in storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage quota exceeded writing {key}: {attempted} bytes against a {capacity} byte budget")]
    QuotaExceeded {
        key: String,
        attempted: usize,
        capacity: usize,
    },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;
