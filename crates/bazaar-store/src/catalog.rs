//! # Product Catalog Collaborator
//!
//! The cart persists product references with frozen display fields.
//! Rendering the cart screen wants live data too: current price, stock
//! state, imagery. The catalog collaborator supplies it.
//!
//! ## Skip-On-Failure Hydration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    hydrate_cart_view                                    │
//! │                                                                         │
//! │  stored cart: [x, y, z]                                                │
//! │       │                                                                 │
//! │       ▼  get_by_id per line                                            │
//! │  x → Ok(Some(product))   → included                                    │
//! │  y → Ok(None)            → skipped (delisted)                          │
//! │  z → Err(backend)        → skipped, logged                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  view: [x]  — one bad lookup never aborts the whole hydration          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bazaar_core::{Cart, CartLine, ProductSummary};

use crate::error::StoreResult;

// =============================================================================
// Trait
// =============================================================================

/// Asynchronous product lookup.
///
/// Implemented by `SqliteCatalog` in bazaar-db and by fakes in tests.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Looks up a product by catalog id. `Ok(None)` means the product
    /// no longer exists (delisted, purged).
    async fn get_by_id(&self, product_id: &str) -> StoreResult<Option<ProductSummary>>;
}

// =============================================================================
// Cart View
// =============================================================================

/// A cart line enriched with the live catalog record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartViewLine {
    /// The stored line (frozen price, quantity).
    pub line: CartLine,

    /// The live catalog record (current price, image, stock).
    pub product: ProductSummary,
}

impl CartViewLine {
    /// Whether the catalog price moved since the line was added.
    pub fn price_changed(&self) -> bool {
        self.line.unit_price_cents != self.product.price_cents
    }
}

/// The cart as rendered by the cart screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Lines whose catalog lookup succeeded, in cart order.
    pub lines: Vec<CartViewLine>,

    /// Number of stored lines omitted because their lookup failed or
    /// the product is gone.
    pub skipped: usize,

    /// Subtotal over the included lines, at the frozen prices.
    pub subtotal_cents: i64,
}

/// Enriches a stored cart with live catalog records.
///
/// Lines whose lookup fails or comes back empty are omitted from the
/// view; the rest of the cart is unaffected. The stored cart itself is
/// never modified here.
pub async fn hydrate_cart_view(cart: &Cart, catalog: &dyn ProductCatalog) -> CartView {
    let mut lines = Vec::with_capacity(cart.lines.len());
    let mut skipped = 0;

    for line in &cart.lines {
        match catalog.get_by_id(&line.product_id).await {
            Ok(Some(product)) => {
                lines.push(CartViewLine {
                    line: line.clone(),
                    product,
                });
            }
            Ok(None) => {
                debug!(product_id = %line.product_id, "cart line product is gone, skipping");
                skipped += 1;
            }
            Err(e) => {
                warn!(
                    product_id = %line.product_id,
                    error = %e,
                    "cart line lookup failed, skipping"
                );
                skipped += 1;
            }
        }
    }

    let subtotal_cents = lines
        .iter()
        .map(|v| v.line.line_total().cents())
        .sum();

    CartView {
        lines,
        skipped,
        subtotal_cents,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::collections::HashMap;

    /// Catalog fake: known products resolve, "err-*" ids fail.
    struct FakeCatalog {
        products: HashMap<String, ProductSummary>,
    }

    impl FakeCatalog {
        fn with(products: Vec<ProductSummary>) -> Self {
            FakeCatalog {
                products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
            }
        }
    }

    #[async_trait]
    impl ProductCatalog for FakeCatalog {
        async fn get_by_id(&self, product_id: &str) -> StoreResult<Option<ProductSummary>> {
            if product_id.starts_with("err-") {
                return Err(StoreError::backend("catalog unavailable"));
            }
            Ok(self.products.get(product_id).cloned())
        }
    }

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
    async fn test_failed_lookup_skips_only_that_line() {
        let mut cart = Cart::new();
        cart.add_line(&product("x", 100), 1).unwrap();
        cart.add_line(&product("err-y", 200), 1).unwrap();
        cart.add_line(&product("gone", 300), 1).unwrap();

        let catalog = FakeCatalog::with(vec![product("x", 100)]);
        let view = hydrate_cart_view(&cart, &catalog).await;

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].line.product_id, "x");
        assert_eq!(view.skipped, 2);
        assert_eq!(view.subtotal_cents, 100);
    }

    #[tokio::test]
    async fn test_price_change_is_visible_but_not_applied() {
        let mut cart = Cart::new();
        cart.add_line(&product("x", 100), 2).unwrap();

        // Catalog price moved after the line was added
        let catalog = FakeCatalog::with(vec![product("x", 150)]);
        let view = hydrate_cart_view(&cart, &catalog).await;

        assert!(view.lines[0].price_changed());
        // Subtotal still uses the frozen price
        assert_eq!(view.subtotal_cents, 200);
    }
}
