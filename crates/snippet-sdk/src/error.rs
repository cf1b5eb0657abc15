//! Error types for the SDK.

use crate::assistant::AssistantError;
use snippet_handoff::HandoffError;
use snippet_registry::RegistryError;
use snippet_store::StorageError;
use thiserror::Error;

/// Errors surfaced by the high-level workspace API.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("handoff error: {0}")]
    Handoff(#[from] HandoffError),

    #[error("assistant error: {0}")]
    Assistant(#[from] AssistantError),

    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),

    #[error("corrupt chat history for {document_id}: {reason}")]
    CorruptChatHistory {
        document_id: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, SdkError>;
