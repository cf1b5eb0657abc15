//! Error types for the document registry.

use snippet_store::StorageError;
use thiserror::Error;

/// Errors that can occur in registry operations.
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    /// Deleting the only remaining document is refused.
    #[error("Cannot delete the last remaining document")]
    LastDocument,

    /// The registry has no resolvable active document. Unreachable while the
    /// never-empty invariant holds.
    #[error("No active document")]
    NoActiveDocument,

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Corrupt persisted state under {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
