//! Document registry for the snippet-today workspace.
//!
//! The registry is the single source of truth for the set of documents and
//! which one is active. Every mutation persists through the injected
//! [`snippet_store::Storage`] port before touching in-memory state, so a
//! failed write never leaves memory and storage diverged.
//!
//! Two invariants hold after every operation:
//!
//! - the document list is never empty (deleting the last document is refused)
//! - the active pointer always resolves to a member of the list

pub mod document;
pub mod error;
pub mod registry;

pub use document::{initial_body, Document, DocumentId, DEFAULT_NAME, RECEIVED_NAME};
pub use error::{RegistryError, Result};
pub use registry::DocumentRegistry;
