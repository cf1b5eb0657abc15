//! In-memory storage for testing and simulation.

use crate::error::{Result, StorageError};
use crate::storage::Storage;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory [`Storage`] implementation.
///
/// Optionally enforces a byte capacity over the sum of all keys and values,
/// so quota-exhaustion behavior can be exercised in tests the same way a
/// browser profile runs out of local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryStorage {
    /// Create an unbounded in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once `capacity` bytes are used.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }

    /// Total bytes currently held (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();

        if let Some(capacity) = self.capacity {
            let current: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
            let existing = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let attempted = current - existing + key.len() + value.len();
            if attempted > capacity {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    attempted,
                    capacity,
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}
