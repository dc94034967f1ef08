//! # bazaar-store: The Local Reactive Store
//!
//! One authoritative in-memory copy of each client collection, every
//! subscriber kept synchronized, and a durable copy kept eventually
//! consistent with memory.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Mobile shells ──► subscribe / mutate ──► ★ bazaar-store ★            │
//! │                                                  │                      │
//! │                         collections (bazaar-core)│                      │
//! │                                                  │                      │
//! │                     StorageAdapter / ProductCatalog                     │
//! │                       │            │            │                       │
//! │                  MemoryStorage  FileStorage  bazaar-db (SQLite)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Generic [`ReactiveStore`]: subscribe, mutate, hydrate, clear
//! - [`stores`] - The five instantiations (cart, wishlist, addresses, theme,
//!   partner prefs) and their operation sets
//! - [`storage`] - The [`StorageAdapter`] contract and [`MemoryStorage`]
//! - [`file`] - [`FileStorage`], one JSON document per key
//! - [`catalog`] - [`ProductCatalog`] collaborator and cart-view hydration
//! - [`session`] - Per-app store bundles
//! - [`error`] - [`StoreError`]
//!
//! ## Failure Semantics
//!
//! Persistence is best-effort and asynchronous. A failed write leaves
//! memory and storage diverged until the next successful write; every
//! save is the entire current state, so the divergence is bounded and
//! self-healing. No storage failure ever reaches the mutation path.

pub mod catalog;
pub mod error;
pub mod file;
pub mod session;
pub mod storage;
pub mod store;
pub mod stores;

pub use catalog::{hydrate_cart_view, CartView, CartViewLine, ProductCatalog};
pub use error::{StoreError, StoreResult};
pub use file::FileStorage;
pub use session::{PartnerSession, StorefrontSession};
pub use storage::{MemoryStorage, StorageAdapter};
pub use store::{ReactiveStore, StoreState, Subscription};
pub use stores::{AddressStore, CartStore, PartnerPrefsStore, ThemeStore, WishlistStore};
