//! Receiver side of a handoff session.

use crate::error::{HandoffError, Result};
use crate::payload::TransferPayload;
use crate::status::HandoffStatus;
use crate::transport::{PeerConnection, PeerEndpoint, PeerId};
use snippet_registry::{DocumentId, DocumentRegistry, RECEIVED_NAME};
use snippet_store::Storage;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// One-shot receiving session.
///
/// Connects to the sender named in a share link, waits for exactly one
/// payload, validates it strictly and inserts it into the local registry as
/// a new active document named "Received Document". Invalid or empty
/// payloads fail the session instead of creating a blank document.
pub struct ReceiverSession<E: PeerEndpoint> {
    endpoint: E,
    remote: PeerId,
    status_tx: watch::Sender<HandoffStatus>,
}

impl<E: PeerEndpoint> ReceiverSession<E> {
    pub fn new(endpoint: E, remote: PeerId) -> Self {
        let (status_tx, _) = watch::channel(HandoffStatus::Initializing);
        Self {
            endpoint,
            remote,
            status_tx,
        }
    }

    /// Observe status transitions.
    pub fn status(&self) -> watch::Receiver<HandoffStatus> {
        self.status_tx.subscribe()
    }

    /// Drive the session to completion, inserting the received document into
    /// `registry`. Consumes the session; returns the new document's id.
    pub async fn run<S: Storage>(
        mut self,
        registry: &mut DocumentRegistry<S>,
    ) -> Result<DocumentId> {
        if let Err(e) = self.endpoint.open().await {
            return Err(self.fail(e));
        }
        self.transition(HandoffStatus::AwaitingPeer);

        let mut conn = match self.endpoint.connect(&self.remote).await {
            Ok(conn) => conn,
            Err(e) => return Err(self.fail(e)),
        };
        self.transition(HandoffStatus::Connected);

        // Exactly one data message per session.
        let frame = match conn.recv().await {
            Ok(frame) => frame,
            Err(e) => return Err(self.fail(e)),
        };
        self.transition(HandoffStatus::Transferring);

        let payload = match TransferPayload::decode(&frame) {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(e)),
        };

        let id = match self.insert(registry, &payload) {
            Ok(id) => id,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(HandoffStatus::Completed);
        conn.close();
        self.endpoint.close();
        info!(id = %id, from = %self.remote, "document received");
        Ok(id)
    }

    /// Insert the payload as a new active document. All-or-nothing: if any
    /// step after `create` fails, the half-inserted document is deleted and
    /// the previous active document restored, so a failed session never
    /// leaves a stray "Received Document" behind.
    fn insert<S: Storage>(
        &self,
        registry: &mut DocumentRegistry<S>,
        payload: &TransferPayload,
    ) -> Result<DocumentId> {
        let previous_active = registry.active_id().clone();
        let doc = registry.create()?;

        if let Err(e) = apply_payload(registry, &doc.id, &payload.content) {
            // Best-effort rollback; the delete frees the space the failed
            // write was competing for.
            let _ = registry.delete(&doc.id);
            let _ = registry.set_active(&previous_active);
            return Err(e.into());
        }
        Ok(doc.id)
    }

    fn transition(&self, status: HandoffStatus) {
        debug!(status = %status, "receiver session");
        let _ = self.status_tx.send(status);
    }

    fn fail(&mut self, error: HandoffError) -> HandoffError {
        warn!(error = %error, "receiver session failed");
        let _ = self.status_tx.send(HandoffStatus::Failed {
            reason: error.to_string(),
        });
        self.endpoint.close();
        error
    }
}

impl<E: PeerEndpoint> Drop for ReceiverSession<E> {
    fn drop(&mut self) {
        self.endpoint.close();
    }
}

/// The post-create steps of an insert, grouped so a failure in any of them
/// rolls the whole insert back.
fn apply_payload<S: Storage>(
    registry: &mut DocumentRegistry<S>,
    id: &DocumentId,
    content: &str,
) -> snippet_registry::Result<()> {
    registry.rename(id, RECEIVED_NAME)?;
    registry.update_content(id, content)?;
    registry.set_active(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRendezvous;
    use snippet_store::MemoryStorage;
    use std::sync::Arc;

    fn registry() -> DocumentRegistry<MemoryStorage> {
        DocumentRegistry::open(Arc::new(MemoryStorage::new())).unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_sender_fails_and_leaves_registry_untouched() {
        let broker = MemoryRendezvous::new();
        let session = ReceiverSession::new(broker.endpoint(), PeerId::new("nobody"));
        let status = session.status();

        let mut registry = registry();
        let err = session.run(&mut registry).await.unwrap_err();
        assert!(matches!(err, HandoffError::PeerUnavailable(_)));
        assert!(matches!(&*status.borrow(), HandoffStatus::Failed { .. }));

        // Registry unmodified: still just the seeded welcome document.
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_id().as_str(), "1");
    }

    #[tokio::test]
    async fn test_empty_payload_rejected_without_creating_document() {
        let broker = MemoryRendezvous::new();

        // A sender endpoint driven by hand so we can put an invalid payload
        // on the wire.
        let mut listener = broker.endpoint();
        let sender_id = listener.open().await.unwrap();
        let sender = tokio::spawn(async move {
            let mut conn = listener.accept().await.unwrap();
            let mut payload = TransferPayload::new("2", "placeholder");
            payload.content = String::new();
            conn.send(serde_json::to_string(&payload).unwrap())
                .await
                .unwrap();
        });

        let session = ReceiverSession::new(broker.endpoint(), sender_id);
        let status = session.status();
        let mut registry = registry();

        let err = session.run(&mut registry).await.unwrap_err();
        assert!(matches!(err, HandoffError::PayloadValidation(_)));
        assert!(matches!(&*status.borrow(), HandoffStatus::Failed { .. }));
        assert_eq!(registry.len(), 1);

        sender.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_content_write_rolls_back_received_document() {
        let broker = MemoryRendezvous::new();
        let mut listener = broker.endpoint();
        let sender_id = listener.open().await.unwrap();
        let sender = tokio::spawn(async move {
            let mut conn = listener.accept().await.unwrap();
            let payload = TransferPayload::new("2", "x".repeat(16 * 1024));
            conn.send(payload.encode().unwrap()).await.unwrap();
        });

        // Room for the welcome document and the created entry, but not for
        // the oversized payload body.
        let storage = Arc::new(MemoryStorage::with_capacity(5000));
        let mut registry = DocumentRegistry::open(storage).unwrap();

        let session = ReceiverSession::new(broker.endpoint(), sender_id);
        let status = session.status();
        let err = session.run(&mut registry).await.unwrap_err();
        assert!(matches!(err, HandoffError::Registry(_)));
        assert!(matches!(&*status.borrow(), HandoffStatus::Failed { .. }));

        // No half-inserted document survives the failure.
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_id().as_str(), "1");
        assert!(registry
            .documents()
            .iter()
            .all(|d| d.name != RECEIVED_NAME));

        sender.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_frame_rejected() {
        let broker = MemoryRendezvous::new();
        let mut listener = broker.endpoint();
        let sender_id = listener.open().await.unwrap();
        let sender = tokio::spawn(async move {
            let mut conn = listener.accept().await.unwrap();
            conn.send("definitely not json".to_string()).await.unwrap();
        });

        let session = ReceiverSession::new(broker.endpoint(), sender_id);
        let mut registry = registry();
        let err = session.run(&mut registry).await.unwrap_err();
        assert!(matches!(err, HandoffError::PayloadValidation(_)));
        assert_eq!(registry.len(), 1);

        sender.await.unwrap();
    }
}
