//! # Key-Value Repository and Storage Adapter
//!
//! The durable side of the reactive stores: a single `kv_entries` table
//! holding one full-state JSON document per storage key.
//!
//! ## Why a Table, Not a File Per Key?
//! Shells that already ship a SQLite database (order history, cached
//! catalog pages) keep store persistence in the same file, one backup
//! artifact, one thing to wipe on sign-out of the device.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use async_trait::async_trait;
use bazaar_store::{StorageAdapter, StoreError, StoreResult};

use crate::error::DbResult;
use crate::pool::Database;

// =============================================================================
// Repository
// =============================================================================

/// Repository for key-value operations.
///
/// ## Usage
/// ```rust,ignore
/// let kv = db.kv();
/// kv.set("bazaar.cart", "{\"lines\":[]}").await?;
/// let payload = kv.get("bazaar.cart").await?;
/// ```
#[derive(Debug, Clone)]
pub struct KvRepository {
    pool: SqlitePool,
}

impl KvRepository {
    /// Creates a new KvRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KvRepository { pool }
    }

    /// Reads the payload stored under `key`, if any.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_entries WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "kv get");
        Ok(value)
    }

    /// Overwrites the payload stored under `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "kv set");
        Ok(())
    }

    /// Erases the payload stored under `key`. Removing a missing key
    /// is not an error.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM kv_entries WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, "kv remove");
        Ok(())
    }
}

// =============================================================================
// Storage Adapter
// =============================================================================

/// [`StorageAdapter`] backed by the `kv_entries` table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db: Database,
}

impl SqliteStorage {
    /// Creates an adapter over an open database.
    pub fn new(db: Database) -> Self {
        SqliteStorage { db }
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.db.kv().get(key).await.map_err(StoreError::backend)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.db
            .kv()
            .set(key, value)
            .await
            .map_err(StoreError::backend)
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.db.kv().remove(key).await.map_err(StoreError::backend)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::DbConfig;
    use std::sync::Arc;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_kv_roundtrip() {
        let db = test_db().await;
        let kv = db.kv();

        assert_eq!(kv.get("k").await.unwrap(), None);

        kv.set("k", "v1").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some("v1".to_string()));

        kv.set("k", "v2").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some("v2".to_string()));

        kv.remove("k").await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let db = test_db().await;
        assert!(db.kv().remove("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let db = test_db().await;
        let kv = db.kv();

        kv.set("bazaar.cart", "cart-payload").await.unwrap();
        kv.set("bazaar.theme", "theme-payload").await.unwrap();
        kv.remove("bazaar.cart").await.unwrap();

        assert_eq!(kv.get("bazaar.cart").await.unwrap(), None);
        assert_eq!(
            kv.get("bazaar.theme").await.unwrap(),
            Some("theme-payload".to_string())
        );
    }

    #[tokio::test]
    async fn test_adapter_through_a_reactive_store() {
        use bazaar_core::ProductSummary;
        use bazaar_store::CartStore;

        let db = test_db().await;
        let storage = Arc::new(SqliteStorage::new(db.clone()));

        let store = CartStore::new(storage.clone());
        let product = ProductSummary {
            id: "prod-1".to_string(),
            name: "Chai Patti".to_string(),
            price_cents: 45000,
            unit: "950 g".to_string(),
            image_url: None,
            in_stock: true,
        };
        store.add_line(&product, 2).unwrap();
        store.flushed().await;

        // Simulated restart over the same database
        let restarted = CartStore::new(storage);
        restarted.hydrate().await;
        let cart = restarted.get();
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.lines[0].name, "Chai Patti");
    }
}
