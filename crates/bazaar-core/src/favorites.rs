//! # Wishlist Collection
//!
//! Product ids the customer has favorited. Set semantics with insertion
//! order preserved, so the wishlist screen renders in the order items
//! were hearted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The wishlist collection.
///
/// ## Invariants
/// - At most one entry per product id (duplicate adds are no-ops)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Wishlist {
    /// Favorited product ids, oldest first.
    pub product_ids: Vec<String>,
}

impl Wishlist {
    /// Creates a new empty wishlist.
    pub fn new() -> Self {
        Wishlist::default()
    }

    /// Adds a product id. Returns `true` if it was newly added,
    /// `false` if it was already present.
    pub fn add(&mut self, product_id: &str) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.product_ids.push(product_id.to_string());
        true
    }

    /// Removes a product id. Returns `true` if it was present.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.product_ids.len();
        self.product_ids.retain(|id| id != product_id);
        self.product_ids.len() != initial_len
    }

    /// Toggles membership. Returns `true` if the product is favorited
    /// after the call.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        if self.remove(product_id) {
            false
        } else {
            self.product_ids.push(product_id.to_string());
            true
        }
    }

    /// Checks membership.
    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }

    /// Number of favorited products.
    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    /// Checks if the wishlist is empty.
    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    /// Clears the wishlist.
    pub fn clear(&mut self) {
        self.product_ids.clear();
    }
}
