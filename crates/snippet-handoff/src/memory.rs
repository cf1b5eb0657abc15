//! In-memory rendezvous and connections for testing and simulation.

use crate::error::{HandoffError, Result};
use crate::transport::{PeerConnection, PeerEndpoint, PeerId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use ulid::Ulid;

/// How many queued frames or pending connections a channel holds.
const CHANNEL_CAPACITY: usize = 8;

/// In-memory rendezvous broker.
///
/// Stands in for the external connection-brokering service: it assigns peer
/// ids and hands the two halves of a fresh duplex channel to the endpoints.
/// Connecting to an id nobody registered fails immediately, which doubles as
/// the transport's own timeout in tests.
#[derive(Clone, Default)]
pub struct MemoryRendezvous {
    listeners: Arc<RwLock<HashMap<PeerId, mpsc::Sender<MemoryConnection>>>>,
}

impl MemoryRendezvous {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh, not-yet-opened endpoint on this broker.
    pub fn endpoint(&self) -> MemoryEndpoint {
        MemoryEndpoint {
            broker: self.clone(),
            local_id: None,
            incoming: None,
        }
    }

    fn register(&self, id: PeerId, tx: mpsc::Sender<MemoryConnection>) {
        self.listeners.write().insert(id, tx);
    }

    fn unregister(&self, id: &PeerId) {
        self.listeners.write().remove(id);
    }

    fn dial(&self, remote: &PeerId) -> Result<mpsc::Sender<MemoryConnection>> {
        self.listeners
            .read()
            .get(remote)
            .cloned()
            .ok_or_else(|| HandoffError::PeerUnavailable(remote.to_string()))
    }
}

/// One side of a brokered duplex channel.
#[derive(Debug)]
pub struct MemoryConnection {
    tx: mpsc::Sender<String>,
    rx: mpsc::Receiver<String>,
    closed: bool,
}

fn duplex() -> (MemoryConnection, MemoryConnection) {
    let (a_tx, a_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (b_tx, b_rx) = mpsc::channel(CHANNEL_CAPACITY);
    (
        MemoryConnection {
            tx: a_tx,
            rx: b_rx,
            closed: false,
        },
        MemoryConnection {
            tx: b_tx,
            rx: a_rx,
            closed: false,
        },
    )
}

#[async_trait]
impl PeerConnection for MemoryConnection {
    async fn send(&mut self, frame: String) -> Result<()> {
        if self.closed {
            return Err(HandoffError::Disconnected);
        }
        self.tx
            .send(frame)
            .await
            .map_err(|_| HandoffError::Disconnected)
    }

    async fn recv(&mut self) -> Result<String> {
        if self.closed {
            return Err(HandoffError::Disconnected);
        }
        self.rx.recv().await.ok_or(HandoffError::Disconnected)
    }

    fn close(&mut self) {
        self.closed = true;
        // Late frames land in a closed channel and are dropped.
        self.rx.close();
    }
}

/// An endpoint on the in-memory broker.
pub struct MemoryEndpoint {
    broker: MemoryRendezvous,
    local_id: Option<PeerId>,
    incoming: Option<mpsc::Receiver<MemoryConnection>>,
}

#[async_trait]
impl PeerEndpoint for MemoryEndpoint {
    type Conn = MemoryConnection;

    async fn open(&mut self) -> Result<PeerId> {
        let id = PeerId::new(Ulid::new().to_string());
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        self.broker.register(id.clone(), tx);
        self.local_id = Some(id.clone());
        self.incoming = Some(rx);
        Ok(id)
    }

    async fn accept(&mut self) -> Result<Self::Conn> {
        let rx = self
            .incoming
            .as_mut()
            .ok_or_else(|| HandoffError::Transport("endpoint not opened".to_string()))?;
        rx.recv().await.ok_or(HandoffError::Disconnected)
    }

    async fn connect(&mut self, remote: &PeerId) -> Result<Self::Conn> {
        let listener = self.broker.dial(remote)?;
        let (ours, theirs) = duplex();
        listener
            .send(theirs)
            .await
            .map_err(|_| HandoffError::PeerUnavailable(remote.to_string()))?;
        Ok(ours)
    }

    fn close(&mut self) {
        if let Some(id) = self.local_id.take() {
            self.broker.unregister(&id);
        }
        self.incoming = None;
    }
}

impl Drop for MemoryEndpoint {
    fn drop(&mut self) {
        self.close();
    }
}
