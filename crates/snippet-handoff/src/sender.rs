//! Sender side of a handoff session.

use crate::error::{HandoffError, Result};
use crate::link::ShareLink;
use crate::payload::TransferPayload;
use crate::status::HandoffStatus;
use crate::transport::{PeerConnection, PeerEndpoint, PeerId};
use tokio::sync::watch;
use tracing::{debug, warn};

/// One-shot sending session.
///
/// Lifecycle: [`open`](Self::open) registers with the rendezvous service and
/// exposes the local id for QR/URL rendering, then [`run`](Self::run) accepts
/// the first incoming connection, pushes exactly one payload and completes.
/// `run` consumes the session - a new one is needed to share again. Any
/// transport error is terminal; dropping the session tears the endpoint down.
pub struct SenderSession<E: PeerEndpoint> {
    endpoint: E,
    local_id: Option<PeerId>,
    status_tx: watch::Sender<HandoffStatus>,
}

impl<E: PeerEndpoint> SenderSession<E> {
    pub fn new(endpoint: E) -> Self {
        let (status_tx, _) = watch::channel(HandoffStatus::Initializing);
        Self {
            endpoint,
            local_id: None,
            status_tx,
        }
    }

    /// Observe status transitions. The receiver always holds the latest
    /// status, including the terminal one.
    pub fn status(&self) -> watch::Receiver<HandoffStatus> {
        self.status_tx.subscribe()
    }

    /// Rendezvous id, available once `open` has succeeded.
    pub fn local_id(&self) -> Option<&PeerId> {
        self.local_id.as_ref()
    }

    /// Register with the rendezvous service; transitions to awaiting-peer and
    /// returns the id to render as a QR code or link.
    pub async fn open(&mut self) -> Result<PeerId> {
        match self.endpoint.open().await {
            Ok(id) => {
                self.local_id = Some(id.clone());
                self.transition(HandoffStatus::AwaitingPeer);
                Ok(id)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// The receive link for this session, once opened.
    pub fn share_link(&self, origin: &str) -> Option<ShareLink> {
        self.local_id
            .as_ref()
            .map(|id| ShareLink::new(origin, id.clone()))
    }

    /// Accept one connection and push the document snapshot.
    ///
    /// Only one concurrent connection is supported; later connection attempts
    /// queue behind the first and are dropped with the endpoint.
    pub async fn run(mut self, document_id: &str, content: &str) -> Result<()> {
        if self.local_id.is_none() {
            self.open().await?;
        }

        let mut conn = match self.endpoint.accept().await {
            Ok(conn) => conn,
            Err(e) => return Err(self.fail(e)),
        };
        self.transition(HandoffStatus::Connected);

        let payload = TransferPayload::new(document_id, content);
        let frame = match payload.encode() {
            Ok(frame) => frame,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(HandoffStatus::Transferring);
        if let Err(e) = conn.send(frame).await {
            return Err(self.fail(e));
        }

        self.transition(HandoffStatus::Completed);
        conn.close();
        self.endpoint.close();
        Ok(())
    }

    fn transition(&self, status: HandoffStatus) {
        debug!(status = %status, "sender session");
        let _ = self.status_tx.send(status);
    }

    fn fail(&mut self, error: HandoffError) -> HandoffError {
        warn!(error = %error, "sender session failed");
        let _ = self.status_tx.send(HandoffStatus::Failed {
            reason: error.to_string(),
        });
        self.endpoint.close();
        error
    }
}

impl<E: PeerEndpoint> Drop for SenderSession<E> {
    fn drop(&mut self) {
        // Teardown runs unconditionally; endpoint close is idempotent.
        self.endpoint.close();
    }
}
