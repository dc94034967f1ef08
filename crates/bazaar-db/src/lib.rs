//! # bazaar-db: Database Layer for Bazaar
//!
//! SQLite-backed implementations of the bazaar-store collaborator
//! traits: [`SqliteStorage`] persists the reactive stores, and
//! [`SqliteCatalog`] answers product lookups for cart-view hydration.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   bazaar-store                                                          │
//! │   ├── StorageAdapter  ◄── SqliteStorage ──► kv_entries table           │
//! │   └── ProductCatalog  ◄── SqliteCatalog ──► products table             │
//! │                                                                         │
//! │   One pool, one file, WAL mode. Repositories are cheap clones of       │
//! │   the pool handle.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let db = Database::new(DbConfig::new(data_dir.join("bazaar.db"))).await?;
//! let storage = Arc::new(SqliteStorage::new(db.clone()));
//!
//! let session = StorefrontSession::new(storage);
//! session.hydrate_all().await;
//! ```

pub mod catalog;
pub mod error;
pub mod kv;
pub mod pool;
pub mod schema;

pub use catalog::{ProductRepository, SqliteCatalog};
pub use error::{DbError, DbResult};
pub use kv::{KvRepository, SqliteStorage};
pub use pool::{Database, DbConfig};
