//! # Domain Stores
//!
//! The five collections the client manages, each an instantiation of
//! [`ReactiveStore`]. The near-duplicate per-collection stores of a
//! typical mobile codebase collapse into one parametrized store plus
//! these thin operation sets.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Store Instantiations                                 │
//! │                                                                         │
//! │  CartStore          = ReactiveStore<Cart>            "bazaar.cart"     │
//! │  WishlistStore      = ReactiveStore<Wishlist>        "bazaar.wishlist" │
//! │  AddressStore       = ReactiveStore<AddressBook>     "bazaar.addresses"│
//! │  ThemeStore         = ReactiveStore<ThemePreference> "bazaar.theme"    │
//! │  PartnerPrefsStore  = ReactiveStore<PartnerPrefs>    "bazaar.partner"  │
//! │                                                                         │
//! │  Every operation applies the bazaar-core rule, notifies subscribers    │
//! │  with the new snapshot, and queues a full-state save.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bazaar_core::{
    Address, AddressBook, Cart, CoreResult, OrderStatusFilter, PartnerPrefs, ProductSummary,
    ThemeMode, ThemePreference, Wishlist,
};

use crate::store::{ReactiveStore, StoreState};

// =============================================================================
// Storage Keys
// =============================================================================

impl StoreState for Cart {
    const STORAGE_KEY: &'static str = "bazaar.cart";
}

impl StoreState for Wishlist {
    const STORAGE_KEY: &'static str = "bazaar.wishlist";
}

impl StoreState for AddressBook {
    const STORAGE_KEY: &'static str = "bazaar.addresses";
}

impl StoreState for ThemePreference {
    const STORAGE_KEY: &'static str = "bazaar.theme";
}

impl StoreState for PartnerPrefs {
    const STORAGE_KEY: &'static str = "bazaar.partner";
}

// =============================================================================
// Type Aliases
// =============================================================================

/// Shopping cart store.
pub type CartStore = ReactiveStore<Cart>;

/// Wishlist store.
pub type WishlistStore = ReactiveStore<Wishlist>;

/// Address book store.
pub type AddressStore = ReactiveStore<AddressBook>;

/// Theme preference store.
pub type ThemeStore = ReactiveStore<ThemePreference>;

/// Delivery-partner preference store.
pub type PartnerPrefsStore = ReactiveStore<PartnerPrefs>;

// =============================================================================
// Cart Operations
// =============================================================================

impl CartStore {
    /// Adds a product to the cart, merging by product id.
    ///
    /// Returns the updated cart snapshot.
    pub fn add_line(&self, product: &ProductSummary, quantity: i64) -> CoreResult<Cart> {
        self.try_mutate(|cart| cart.add_line(product, quantity))
    }

    /// Sets a line's quantity (floors at 1).
    pub fn set_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<Cart> {
        self.try_mutate(|cart| cart.set_quantity(product_id, quantity))
    }

    /// Increments a line's quantity by one.
    pub fn increment(&self, product_id: &str) -> CoreResult<Cart> {
        self.try_mutate(|cart| cart.increment(product_id))
    }

    /// Decrements a line's quantity by one (floors at 1).
    pub fn decrement(&self, product_id: &str) -> CoreResult<Cart> {
        self.try_mutate(|cart| cart.decrement(product_id))
    }

    /// Removes a line from the cart.
    pub fn remove_line(&self, product_id: &str) -> CoreResult<Cart> {
        self.try_mutate(|cart| cart.remove_line(product_id))
    }
}

// =============================================================================
// Wishlist Operations
// =============================================================================

impl WishlistStore {
    /// Toggles a product's membership. Returns `true` if favorited
    /// after the call.
    pub fn toggle(&self, product_id: &str) -> bool {
        self.mutate(|w| w.toggle(product_id))
    }

    /// Adds a product id (no-op when already present).
    pub fn add(&self, product_id: &str) -> Wishlist {
        self.mutate(|w| {
            w.add(product_id);
            w.clone()
        })
    }

    /// Removes a product id.
    pub fn remove(&self, product_id: &str) -> Wishlist {
        self.mutate(|w| {
            w.remove(product_id);
            w.clone()
        })
    }

    /// Checks membership against the current snapshot.
    pub fn contains(&self, product_id: &str) -> bool {
        self.get().contains(product_id)
    }
}

// =============================================================================
// Address Book Operations
// =============================================================================

impl AddressStore {
    /// Inserts or replaces an address (validated; first insert becomes
    /// the default).
    pub fn upsert(&self, address: Address) -> CoreResult<AddressBook> {
        self.try_mutate(|book| book.upsert(address))
    }

    /// Marks one address as the default, clearing every other flag.
    pub fn set_default(&self, id: &str) -> CoreResult<AddressBook> {
        self.try_mutate(|book| book.set_default(id))
    }

    /// Removes an address; removing the default promotes the earliest
    /// remaining one.
    pub fn remove(&self, id: &str) -> CoreResult<AddressBook> {
        self.try_mutate(|book| book.remove(id))
    }
}

// =============================================================================
// Preference Operations
// =============================================================================

impl ThemeStore {
    /// Sets the theme mode.
    pub fn set_mode(&self, mode: ThemeMode) -> ThemePreference {
        self.mutate(|p| {
            p.mode = mode;
            *p
        })
    }

    /// Flips between light and dark.
    pub fn toggle_mode(&self) -> ThemePreference {
        self.mutate(|p| {
            p.mode = p.mode.toggled();
            *p
        })
    }
}

impl PartnerPrefsStore {
    /// Sets the orders list filter.
    pub fn set_status_filter(&self, filter: OrderStatusFilter) -> PartnerPrefs {
        self.mutate(|p| {
            p.status_filter = filter;
            *p
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageAdapter};
    use std::sync::Arc;

    fn product(id: &str, price_cents: i64) -> ProductSummary {
        ProductSummary {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            unit: "each".to_string(),
            image_url: None,
            in_stock: true,
        }
    }

    #[tokio::test]
    async fn test_cart_merge_sequence() {
        // start empty; add {x,1}; add {x,2}; add {y,1}
        let store = CartStore::new(Arc::new(MemoryStorage::new()));

        store.add_line(&product("x", 100), 1).unwrap();
        store.add_line(&product("x", 100), 2).unwrap();
        let cart = store.add_line(&product("y", 250), 1).unwrap();

        // expect [{x,3},{y,1}]
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.lines[0].product_id, "x");
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.lines[1].product_id, "y");
        assert_eq!(cart.lines[1].quantity, 1);
    }

    #[tokio::test]
    async fn test_cart_survives_restart() {
        let storage = Arc::new(MemoryStorage::new());

        let store = CartStore::new(storage.clone());
        store.add_line(&product("x", 100), 2).unwrap();
        store.flushed().await;

        let restarted = CartStore::new(storage);
        restarted.hydrate().await;
        let cart = restarted.get();
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.lines[0].product_id, "x");
    }

    #[tokio::test]
    async fn test_cart_error_leaves_snapshot_and_storage_alone() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CartStore::new(storage.clone());

        assert!(store.remove_line("ghost").is_err());
        store.flushed().await;

        assert!(store.get().is_empty());
        assert!(storage.get("bazaar.cart").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wishlist_set_semantics() {
        let store = WishlistStore::new(Arc::new(MemoryStorage::new()));

        store.add("a");
        store.add("a");
        store.add("b");

        let w = store.get();
        assert_eq!(w.product_ids, vec!["a", "b"]);

        assert!(!store.toggle("a"));
        assert!(!store.contains("a"));
    }

    #[tokio::test]
    async fn test_address_store_default_invariant() {
        let store = AddressStore::new(Arc::new(MemoryStorage::new()));

        let home = Address::new(
            "Home",
            "Ayesha Khan",
            "+92 300 1234567",
            "House 12, Street 4",
            None,
            "Lahore",
            "54000",
        );
        let office = Address::new(
            "Office",
            "Ayesha Khan",
            "+92 300 1234567",
            "Plot 9, Gulberg III",
            Some("3rd floor".to_string()),
            "Lahore",
            "54660",
        );
        let office_id = office.id.clone();

        store.upsert(home).unwrap();
        let book = store.upsert(office).unwrap();
        assert_eq!(book.addresses.iter().filter(|a| a.is_default).count(), 1);

        let book = store.set_default(&office_id).unwrap();
        assert_eq!(book.addresses.iter().filter(|a| a.is_default).count(), 1);
        assert_eq!(book.default_address().unwrap().id, office_id);
    }

    #[tokio::test]
    async fn test_theme_store_roundtrip() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ThemeStore::new(storage.clone());

        let prefs = store.toggle_mode();
        assert_eq!(prefs.mode, ThemeMode::Dark);
        store.flushed().await;

        let restarted = ThemeStore::new(storage);
        restarted.hydrate().await;
        assert_eq!(restarted.get().mode, ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_partner_filter_store() {
        let store = PartnerPrefsStore::new(Arc::new(MemoryStorage::new()));

        let prefs = store.set_status_filter(OrderStatusFilter::PickedUp);
        assert_eq!(prefs.status_filter, OrderStatusFilter::PickedUp);

        store.clear();
        assert_eq!(store.get().status_filter, OrderStatusFilter::All);
    }
}
