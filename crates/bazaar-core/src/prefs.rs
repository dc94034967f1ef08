//! # Preference Records
//!
//! Single-value device preferences managed as reactive stores: the
//! storefront theme and the delivery-partner orders filter.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Theme
// =============================================================================

/// Theme mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    /// Light appearance.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

impl ThemeMode {
    /// Returns the opposite mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
        }
    }
}

/// The persisted theme preference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePreference {
    /// Selected appearance.
    pub mode: ThemeMode,
}

// =============================================================================
// Delivery-Partner Orders Filter
// =============================================================================

/// Status filter applied to the partner app's orders list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusFilter {
    /// Show every assigned order.
    #[default]
    All,
    /// Orders waiting for pickup.
    Pending,
    /// Orders the rider has collected.
    PickedUp,
    /// Completed deliveries.
    Delivered,
}

impl OrderStatusFilter {
    /// All filter values, in tab order.
    pub fn all() -> &'static [OrderStatusFilter] {
        &[
            OrderStatusFilter::All,
            OrderStatusFilter::Pending,
            OrderStatusFilter::PickedUp,
            OrderStatusFilter::Delivered,
        ]
    }
}

impl std::fmt::Display for OrderStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusFilter::All => write!(f, "All"),
            OrderStatusFilter::Pending => write!(f, "Pending"),
            OrderStatusFilter::PickedUp => write!(f, "Picked up"),
            OrderStatusFilter::Delivered => write!(f, "Delivered"),
        }
    }
}

/// The persisted delivery-partner preference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerPrefs {
    /// Orders list filter.
    pub status_filter: OrderStatusFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ThemePreference::default().mode, ThemeMode::Light);
        assert_eq!(
            PartnerPrefs::default().status_filter,
            OrderStatusFilter::All
        );
    }
}
