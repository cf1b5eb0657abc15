//! Writing assistant port.
//!
//! The workspace talks to an external chat model through the
//! [`AssistantClient`] trait. The trait receives the running conversation
//! plus the current document text; implementations decide how to reach
//! their backend. Tests plug in scripted fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a document's chat history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// What the workspace hands to an assistant backend: the trailing slice of
/// the conversation and the full text of the document being discussed.
#[derive(Clone, Debug)]
pub struct AssistantRequest {
    pub messages: Vec<Message>,
    pub document_text: String,
    pub api_key: String,
}

/// Errors from the assistant path.
#[derive(Error, Debug)]
pub enum AssistantError {
    /// The document is too long to send. Enforced locally, before any
    /// request leaves the workspace.
    #[error("document is {words} words, over the {limit}-word assistant limit")]
    WordLimitExceeded { words: usize, limit: usize },

    #[error("no API key configured")]
    MissingApiKey,

    #[error("assistant backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("assistant payload error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A chat model backend.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Send one turn of conversation and return the assistant's reply.
    async fn complete(&self, request: AssistantRequest) -> Result<String, AssistantError>;
}
