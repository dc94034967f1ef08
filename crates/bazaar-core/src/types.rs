//! # Shared Domain Types
//!
//! Records shared between the reactive stores and the external
//! collaborators (product catalog, storage backends).
//!
//! ## Identity
//! Products are identified by the catalog's string id. Cart lines and
//! wishlist entries store only that id plus frozen display fields; the
//! catalog remains the authority for live data (current price, stock,
//! imagery).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Summary
// =============================================================================

/// The product record returned by the catalog collaborator.
///
/// This is the shape a cart line is created from and the shape used to
/// re-hydrate display fields when rendering a stored cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Catalog identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Current price in minor currency units.
    pub price_cents: i64,

    /// Retail unit the price applies to ("1 kg", "dozen", "500 ml").
    pub unit: String,

    /// Primary image, if the catalog has one.
    pub image_url: Option<String>,

    /// Whether the product is currently orderable.
    pub in_stock: bool,
}

impl ProductSummary {
    /// Returns the current price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}
