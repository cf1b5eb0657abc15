//! One-shot peer-to-peer document handoff.
//!
//! A handoff session coordinates exactly one content transfer between two
//! browser-like endpoints without a central server: the rendezvous service
//! only brokers the initial connection, never the data. The sender publishes
//! a share link carrying its rendezvous id; the receiver connects with that
//! id, waits for a single payload and inserts it into its local document
//! registry.
//!
//! Sessions are one-shot: `run` consumes the session, and `completed`/
//! `failed` are terminal. A new session must be created for any subsequent
//! transfer; there is no retry or reconnect logic.
//!
//! Wire transport is abstracted behind [`PeerEndpoint`]/[`PeerConnection`];
//! the in-memory [`MemoryRendezvous`] connects endpoints for tests and
//! simulation.

pub mod error;
pub mod link;
pub mod memory;
pub mod payload;
pub mod receiver;
pub mod sender;
pub mod status;
pub mod transport;

pub use error::{HandoffError, Result};
pub use link::ShareLink;
pub use memory::{MemoryConnection, MemoryEndpoint, MemoryRendezvous};
pub use payload::{TransferPayload, PAYLOAD_KIND, PAYLOAD_VERSION};
pub use receiver::ReceiverSession;
pub use sender::SenderSession;
pub use status::HandoffStatus;
pub use transport::{PeerConnection, PeerEndpoint, PeerId};
