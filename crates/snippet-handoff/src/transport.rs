//! Transport ports for handoff sessions.
//!
//! The rendezvous service assigns opaque peer ids and brokers connection
//! setup; it never relays document data. Implementations own NAT traversal
//! and wire details - sessions only see frames.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Opaque rendezvous identifier assigned by the brokering service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point-to-point data channel between two endpoints.
#[async_trait]
pub trait PeerConnection: Send + 'static {
    /// Send one frame to the remote peer.
    async fn send(&mut self, frame: String) -> Result<()>;

    /// Wait for the next frame from the remote peer.
    ///
    /// Returns `Disconnected` once the channel is closed.
    async fn recv(&mut self) -> Result<String>;

    /// Tear the channel down. Idempotent; frames arriving afterwards are
    /// discarded.
    fn close(&mut self);
}

/// An endpoint registered with the rendezvous service.
#[async_trait]
pub trait PeerEndpoint: Send + 'static {
    type Conn: PeerConnection;

    /// Register with the rendezvous service and obtain a local id.
    async fn open(&mut self) -> Result<PeerId>;

    /// Wait for the next incoming connection (sender side).
    async fn accept(&mut self) -> Result<Self::Conn>;

    /// Connect to a remote peer by rendezvous id (receiver side).
    async fn connect(&mut self, remote: &PeerId) -> Result<Self::Conn>;

    /// Unregister and drop any pending connections. Idempotent.
    fn close(&mut self);
}
