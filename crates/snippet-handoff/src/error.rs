//! Error types for handoff sessions.

use snippet_registry::RegistryError;
use thiserror::Error;

/// Errors that can occur during a handoff session. All of them are terminal
/// for the session that raised them.
#[derive(Error, Debug, Clone)]
pub enum HandoffError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Peer not reachable: {0}")]
    PeerUnavailable(String),

    #[error("Connection closed before the transfer completed")]
    Disconnected,

    #[error("Invalid payload: {0}")]
    PayloadValidation(String),

    #[error("Invalid share link: {0}")]
    InvalidLink(String),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

pub type Result<T> = std::result::Result<T, HandoffError>;
