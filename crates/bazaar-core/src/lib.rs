//! # bazaar-core: Pure Domain Collections for Bazaar
//!
//! This crate is the **heart** of the Bazaar client. It contains every
//! collection the reactive stores manage, as pure data types with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bazaar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Mobile Shells (storefront / partner app)             │   │
//! │  │    Home ──► Product ──► Cart ──► Checkout ──► Orders            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ subscriptions                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                bazaar-store (reactive stores)                   │   │
//! │  │    CartStore, WishlistStore, AddressStore, ThemeStore           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bazaar-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   cart    │  │ favorites │  │  address  │  │   prefs   │  │   │
//! │  │   │   Cart    │  │ Wishlist  │  │AddressBook│  │ ThemeMode │  │   │
//! │  │   │ CartLine  │  │           │  │  Address  │  │  filters  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Shopping cart with merge-by-key line handling
//! - [`favorites`] - Wishlist with set semantics
//! - [`address`] - Address book with the single-default rule
//! - [`prefs`] - Theme and delivery-partner preference records
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Shared records (product summaries)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every mutation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod address;
pub mod cart;
pub mod error;
pub mod favorites;
pub mod money;
pub mod prefs;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use bazaar_core::Cart` instead of
// `use bazaar_core::cart::Cart`

pub use address::{Address, AddressBook};
pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use favorites::Wishlist;
pub use money::Money;
pub use prefs::{OrderStatusFilter, PartnerPrefs, ThemeMode, ThemePreference};
pub use types::ProductSummary;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps a full-state persistence payload small.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum addresses a single account may keep on file
pub const MAX_ADDRESSES: usize = 20;
