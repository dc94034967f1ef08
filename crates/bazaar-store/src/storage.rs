//! # Storage Adapter
//!
//! The durable key-value capability behind every reactive store.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    StorageAdapter Contract                              │
//! │                                                                         │
//! │  get(key)    → Some(payload) | None          (None = no prior state)   │
//! │  set(key, v) → full-state JSON overwrite     (never a delta)           │
//! │  remove(key) → erases the durable copy       (idempotent)              │
//! │                                                                         │
//! │  All three may fail. The store catches and logs failures on the        │
//! │  hydration and persistence paths; they never reach the UI path.        │
//! │                                                                         │
//! │  Ordering: the store issues writes for one key in mutation order       │
//! │  from a single task, so an adapter only has to preserve call order.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreResult;

// =============================================================================
// Trait
// =============================================================================

/// Asynchronous key-value persistence, string payloads.
///
/// Implementations in this workspace: [`MemoryStorage`] (tests and
/// previews), [`crate::FileStorage`] (on-device JSON documents), and
/// `SqliteStorage` in bazaar-db.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    /// Reads the payload stored under `key`, if any.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrites the payload stored under `key`.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Erases the payload stored under `key`. Removing a missing key
    /// is not an error.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

// =============================================================================
// In-Memory Adapter
// =============================================================================

/// Volatile storage adapter.
///
/// Keeps payloads in a map; used by tests and by shells running in
/// preview mode where nothing should touch the device.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory adapter.
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Checks whether no keys are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        debug!(key = %key, bytes = value.len(), "memory storage set");
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        debug!(key = %key, "memory storage remove");
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").await.unwrap(), None);

        storage.set("k", "v").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), Some("v".to_string()));

        storage.remove("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("missing").await.is_ok());
    }
}
