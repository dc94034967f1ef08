//! # Session Wiring
//!
//! Bundles the stores each app shell needs over one shared storage
//! adapter, so startup is a single `hydrate_all().await`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Composition                                  │
//! │                                                                         │
//! │  StorefrontSession               PartnerSession                        │
//! │  ├── cart       (account)        ├── theme  (device)                   │
//! │  ├── wishlist   (account)        └── prefs  (device)                   │
//! │  ├── addresses  (account)                                              │
//! │  └── theme      (device)                                               │
//! │                                                                         │
//! │  sign_out() clears account collections; device preferences survive.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::info;

use crate::storage::StorageAdapter;
use crate::stores::{AddressStore, CartStore, PartnerPrefsStore, ThemeStore, WishlistStore};

// =============================================================================
// Storefront
// =============================================================================

/// The consumer storefront's stores.
#[derive(Debug, Clone)]
pub struct StorefrontSession {
    /// Shopping cart.
    pub cart: CartStore,
    /// Favorited products.
    pub wishlist: WishlistStore,
    /// Delivery addresses.
    pub addresses: AddressStore,
    /// Appearance preference.
    pub theme: ThemeStore,
}

impl StorefrontSession {
    /// Creates the storefront stores over one shared adapter.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        StorefrontSession {
            cart: CartStore::new(Arc::clone(&storage)),
            wishlist: WishlistStore::new(Arc::clone(&storage)),
            addresses: AddressStore::new(Arc::clone(&storage)),
            theme: ThemeStore::new(storage),
        }
    }

    /// Hydrates every store. Each store reads its key at most once, so
    /// calling this again (e.g. on a hot reload) is a no-op.
    pub async fn hydrate_all(&self) {
        tokio::join!(
            self.cart.hydrate(),
            self.wishlist.hydrate(),
            self.addresses.hydrate(),
            self.theme.hydrate(),
        );
        info!("storefront session hydrated");
    }

    /// Clears the account-scoped collections and their durable copies.
    ///
    /// The theme is a device preference and survives sign-out.
    pub fn sign_out(&self) {
        self.cart.clear();
        self.wishlist.clear();
        self.addresses.clear();
        info!("storefront session cleared");
    }

    /// Waits for every queued save to reach the storage adapter.
    pub async fn flushed(&self) {
        tokio::join!(
            self.cart.flushed(),
            self.wishlist.flushed(),
            self.addresses.flushed(),
            self.theme.flushed(),
        );
    }
}

// =============================================================================
// Delivery Partner
// =============================================================================

/// The delivery-partner app's stores.
#[derive(Debug, Clone)]
pub struct PartnerSession {
    /// Appearance preference.
    pub theme: ThemeStore,
    /// Orders list filter.
    pub prefs: PartnerPrefsStore,
}

impl PartnerSession {
    /// Creates the partner stores over one shared adapter.
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        PartnerSession {
            theme: ThemeStore::new(Arc::clone(&storage)),
            prefs: PartnerPrefsStore::new(storage),
        }
    }

    /// Hydrates every store.
    pub async fn hydrate_all(&self) {
        tokio::join!(self.theme.hydrate(), self.prefs.hydrate());
        info!("partner session hydrated");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
