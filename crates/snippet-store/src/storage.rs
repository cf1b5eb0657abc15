//! The synchronous key-value persistence port.

use crate::error::Result;

/// Synchronous key-value persistence.
///
/// All writes are atomic from the caller's perspective: a call either lands
/// completely or fails with an error and leaves the previous value in place.
/// There is no cross-process coordination - if two writers race on the same
/// key, the last write wins.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` and its value if present. Removing an absent key is a
    /// no-op.
    fn remove(&self, key: &str) -> Result<()>;
}
