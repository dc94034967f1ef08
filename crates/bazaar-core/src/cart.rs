//! # Cart Collection
//!
//! The shopping cart collection managed by the cart store.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Collection Operations                           │
//! │                                                                         │
//! │  Shell Action             Store Operation          Collection Change    │
//! │  ────────────             ───────────────          ─────────────────    │
//! │                                                                         │
//! │  Tap "Add to cart" ──────► add_line() ───────────► merge or push       │
//! │                                                                         │
//! │  Tap +/- stepper ────────► increment()/decrement ► qty ± 1 (floor 1)   │
//! │                                                                         │
//! │  Type a quantity ────────► set_quantity() ───────► qty = n (floor 1)   │
//! │                                                                         │
//! │  Tap trash icon ─────────► remove_line() ────────► line removed        │
//! │                                                                         │
//! │  Checkout complete ──────► clear() ──────────────► lines.clear()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product merges by
//!   summing quantity)
//! - Quantity is always ≥ 1; anything lower clamps to 1. Removing a line
//!   is only ever the explicit `remove_line` operation.
//! - Maximum lines: [`crate::MAX_CART_LINES`]
//! - Maximum quantity per line: [`crate::MAX_LINE_QUANTITY`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductSummary;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the shopping cart.
///
/// ## Design Notes
/// - `product_id`: Reference to the catalog record
/// - name/price/unit: Frozen copy of product data at time of adding.
///   The cart keeps displaying consistent data even if the catalog
///   record changes afterwards; live data comes back in through
///   the cart-view hydration in bazaar-store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog product id.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in minor units at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Retail unit at time of adding (frozen), e.g. "1 kg".
    pub unit: String,

    /// Quantity in cart. Always ≥ 1.
    pub quantity: i64,

    /// When this line was first added to the cart.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new cart line from a product and quantity.
    ///
    /// The price is captured at this moment. If the catalog price changes
    /// later, this line retains the original price.
    pub fn from_product(product: &ProductSummary, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            unit: product.unit.clone(),
            quantity: quantity.max(1),
            added_at: Utc::now(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Cart {
    /// Lines in the cart, in the order they were first added.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product to the cart, merging by product id.
    ///
    /// ## Behavior
    /// - Product already in cart: quantities are summed
    /// - Product not in cart: appended as a new line with a frozen
    ///   price snapshot
    /// - Quantities below 1 are treated as 1
    ///
    /// ## Errors
    /// - [`CoreError::QuantityTooLarge`] if the merged quantity would
    ///   exceed [`MAX_LINE_QUANTITY`]
    /// - [`CoreError::CartTooLarge`] if a new line would exceed
    ///   [`MAX_CART_LINES`]
    pub fn add_line(&mut self, product: &ProductSummary, quantity: i64) -> CoreResult<()> {
        let quantity = quantity.max(1);

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let merged = line.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: merged,
                    max: MAX_LINE_QUANTITY,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line, clamping at the floor of 1.
    ///
    /// ## Behavior
    /// - Quantity below 1: clamps to 1 (never removes)
    /// - Product not found: [`CoreError::LineNotFound`]
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity.max(1);
                Ok(())
            }
            None => Err(CoreError::LineNotFound(product_id.to_string())),
        }
    }

    /// Increments a line's quantity by one.
    pub fn increment(&mut self, product_id: &str) -> CoreResult<()> {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                if line.quantity + 1 > MAX_LINE_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: line.quantity + 1,
                        max: MAX_LINE_QUANTITY,
                    });
                }
                line.quantity += 1;
                Ok(())
            }
            None => Err(CoreError::LineNotFound(product_id.to_string())),
        }
    }

    /// Decrements a line's quantity by one, clamping at 1.
    pub fn decrement(&mut self, product_id: &str) -> CoreResult<()> {
        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = (line.quantity - 1).max(1);
                Ok(())
            }
            None => Err(CoreError::LineNotFound(product_id.to_string())),
        }
    }

    /// Removes a line from the cart by product id.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the number of distinct lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the cart subtotal.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total())
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary handed to the shells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal().cents(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: &str, price_cents: i64) -> ProductSummary {
        ProductSummary {
            id: id.to_string(),
            name: format!("Product {}", id),
            price_cents,
            unit: "1 kg".to_string(),
            image_url: None,
            in_stock: true,
        }
    }

    #[test]
    fn test_add_line() {
        let mut cart = Cart::new();
        let product = test_product("x", 999);

        cart.add_line(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_add_same_product_merges_by_key() {
        let mut cart = Cart::new();
        let x = test_product("x", 999);
        let y = test_product("y", 500);

        cart.add_line(&x, 1).unwrap();
        cart.add_line(&x, 2).unwrap();
        cart.add_line(&y, 1).unwrap();

        // One line per key, quantities summed
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.lines[0].product_id, "x");
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.lines[1].product_id, "y");
        assert_eq!(cart.lines[1].quantity, 1);
    }

    #[test]
    fn test_merge_keeps_original_price_snapshot() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("x", 999), 1).unwrap();

        // Same product, catalog price moved
        cart.add_line(&test_product("x", 1099), 1).unwrap();

        assert_eq!(cart.lines[0].unit_price_cents, 999);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_decrement_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("x", 999), 1).unwrap();

        cart.decrement("x").unwrap();

        assert_eq!(cart.lines[0].quantity, 1);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_set_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("x", 999), 5).unwrap();

        cart.set_quantity("x", 0).unwrap();
        assert_eq!(cart.lines[0].quantity, 1);

        cart.set_quantity("x", -3).unwrap();
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("x", 999), MAX_LINE_QUANTITY)
            .unwrap();

        let err = cart.add_line(&test_product("x", 999), 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart.lines[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("x", 999), 1).unwrap();
        cart.add_line(&test_product("y", 500), 1).unwrap();

        cart.remove_line("x").unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines[0].product_id, "y");
        assert!(matches!(
            cart.remove_line("x"),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("x", 999), 2).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn test_totals_summary() {
        let mut cart = Cart::new();
        cart.add_line(&test_product("x", 999), 2).unwrap();
        cart.add_line(&test_product("y", 500), 1).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 3);
        assert_eq!(totals.subtotal_cents, 2498);
    }
}
