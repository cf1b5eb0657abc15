//! Persistence port for the snippet-today workspace.
//!
//! Every durable piece of workspace state lives behind the [`Storage`] trait:
//! a flat, synchronous key-value surface modeled on a single browser profile.
//! The key layout is fixed by the [`keys`] module - one key for the serialized
//! document list, one for the active-document pointer, and one key per
//! document for its content and chat history.
//!
//! Callers inject a [`Storage`] implementation rather than reaching for any
//! ambient global state, which keeps the registry testable against the
//! in-memory [`MemoryStorage`] double.

pub mod error;
pub mod keys;
pub mod memory;
pub mod storage;

pub use error::{Result, StorageError};
pub use memory::MemoryStorage;
pub use storage::Storage;
