//! # Address Book Collection
//!
//! Delivery addresses for the customer's account.
//!
//! ## The Single-Default Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Default Address Handling                             │
//! │                                                                         │
//! │  upsert(first address) ────► becomes default automatically             │
//! │                                                                         │
//! │  set_default(B)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  [A: default] [B] [C]  ──────►  [A] [B: default] [C]                   │
//! │                                                                         │
//! │  remove(B) while B is default                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  earliest remaining address is promoted                                │
//! │                                                                         │
//! │  INVARIANT: a non-empty book has exactly one default address.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_address_fields;
use crate::MAX_ADDRESSES;

// =============================================================================
// Address
// =============================================================================

/// A structured delivery address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Short label shown in pickers ("Home", "Office").
    pub label: String,

    /// Person receiving the delivery.
    pub recipient: String,

    /// Contact phone for the rider.
    pub phone: String,

    /// Street address, first line.
    pub line1: String,

    /// Street address, second line (apartment, floor).
    pub line2: Option<String>,

    /// City.
    pub city: String,

    /// Postal code.
    pub postal_code: String,

    /// Whether this is the account's default delivery address.
    pub is_default: bool,

    /// When the address was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Address {
    /// Creates a new address with a generated id.
    ///
    /// The new address is not default; the book decides that on insert.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        label: impl Into<String>,
        recipient: impl Into<String>,
        phone: impl Into<String>,
        line1: impl Into<String>,
        line2: Option<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Address {
            id: Uuid::new_v4().to_string(),
            label: label.into(),
            recipient: recipient.into(),
            phone: phone.into(),
            line1: line1.into(),
            line2,
            city: city.into(),
            postal_code: postal_code.into(),
            is_default: false,
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Address Book
// =============================================================================

/// The address book collection.
///
/// ## Invariants
/// - At most one entry per address id (same-id upsert replaces)
/// - A non-empty book has exactly one `is_default` address
/// - Maximum addresses: [`MAX_ADDRESSES`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressBook {
    /// Addresses in insertion order.
    pub addresses: Vec<Address>,
}

impl AddressBook {
    /// Creates a new empty address book.
    pub fn new() -> Self {
        AddressBook::default()
    }

    /// Inserts or replaces an address, keyed by id.
    ///
    /// ## Behavior
    /// - Fields are validated before the book is touched
    /// - First address in an empty book becomes the default
    /// - Same-id upsert replaces the stored record in place; its
    ///   default flag follows the stored record, not the argument
    /// - An upsert carrying `is_default = true` clears the previous
    ///   default
    ///
    /// ## Errors
    /// - [`CoreError::Validation`] for bad fields
    /// - [`CoreError::TooManyAddresses`] when inserting past the cap
    pub fn upsert(&mut self, mut address: Address) -> CoreResult<()> {
        validate_address_fields(&address)?;

        if let Some(pos) = self.addresses.iter().position(|a| a.id == address.id) {
            let was_default = self.addresses[pos].is_default;
            let wants_default = address.is_default;
            address.is_default = was_default;
            address.created_at = self.addresses[pos].created_at;
            let id = address.id.clone();
            self.addresses[pos] = address;
            if wants_default && !was_default {
                self.set_default(&id)?;
            }
            return Ok(());
        }

        if self.addresses.len() >= MAX_ADDRESSES {
            return Err(CoreError::TooManyAddresses { max: MAX_ADDRESSES });
        }

        let make_default = self.addresses.is_empty() || address.is_default;
        address.is_default = make_default;
        let id = address.id.clone();
        self.addresses.push(address);
        if make_default {
            self.set_default(&id)?;
        }
        Ok(())
    }

    /// Marks one address as the default, clearing every other flag.
    ///
    /// ## Errors
    /// - [`CoreError::AddressNotFound`] if the id is not in the book
    pub fn set_default(&mut self, id: &str) -> CoreResult<()> {
        if !self.addresses.iter().any(|a| a.id == id) {
            return Err(CoreError::AddressNotFound(id.to_string()));
        }
        for address in &mut self.addresses {
            address.is_default = address.id == id;
        }
        Ok(())
    }

    /// Removes an address by id.
    ///
    /// Removing the default promotes the earliest remaining address.
    pub fn remove(&mut self, id: &str) -> CoreResult<()> {
        let Some(pos) = self.addresses.iter().position(|a| a.id == id) else {
            return Err(CoreError::AddressNotFound(id.to_string()));
        };
        let removed = self.addresses.remove(pos);

        if removed.is_default {
            if let Some(first) = self.addresses.first_mut() {
                first.is_default = true;
            }
        }
        Ok(())
    }

    /// Returns the default address, if any.
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Looks up an address by id.
    pub fn get(&self, id: &str) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Number of addresses on file.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Checks if the book is empty.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Clears the book.
    pub fn clear(&mut self) {
        self.addresses.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_address(label: &str) -> Address {
        Address::new(
            label,
            "Ayesha Khan",
            "+92 300 1234567",
            "House 12, Street 4",
            None,
            "Lahore",
            "54000",
        )
    }

    fn count_defaults(book: &AddressBook) -> usize {
        book.addresses.iter().filter(|a| a.is_default).count()
    }

    #[test]
    fn test_first_address_becomes_default() {
        let mut book = AddressBook::new();
        book.upsert(test_address("Home")).unwrap();

        assert_eq!(book.len(), 1);
        assert!(book.addresses[0].is_default);
    }

    #[test]
    fn test_set_default_is_exclusive() {
        let mut book = AddressBook::new();
        let home = test_address("Home");
        let office = test_address("Office");
        let office_id = office.id.clone();
        book.upsert(home).unwrap();
        book.upsert(office).unwrap();

        book.set_default(&office_id).unwrap();

        assert_eq!(count_defaults(&book), 1);
        assert_eq!(book.default_address().unwrap().id, office_id);

        // Setting the same default again stays exclusive
        book.set_default(&office_id).unwrap();
        assert_eq!(count_defaults(&book), 1);
    }

    #[test]
    fn test_upsert_with_default_flag_clears_previous() {
        let mut book = AddressBook::new();
        book.upsert(test_address("Home")).unwrap();

        let mut office = test_address("Office");
        office.is_default = true;
        let office_id = office.id.clone();
        book.upsert(office).unwrap();

        assert_eq!(count_defaults(&book), 1);
        assert_eq!(book.default_address().unwrap().id, office_id);
    }

    #[test]
    fn test_same_id_upsert_replaces() {
        let mut book = AddressBook::new();
        let mut home = test_address("Home");
        book.upsert(home.clone()).unwrap();

        home.label = "Parents".to_string();
        book.upsert(home.clone()).unwrap();

        assert_eq!(book.len(), 1);
        assert_eq!(book.get(&home.id).unwrap().label, "Parents");
        // Replacement keeps the default flag of the stored record
        assert!(book.get(&home.id).unwrap().is_default);
    }

    #[test]
    fn test_removing_default_promotes_earliest() {
        let mut book = AddressBook::new();
        let home = test_address("Home");
        let home_id = home.id.clone();
        let office = test_address("Office");
        let office_id = office.id.clone();
        book.upsert(home).unwrap();
        book.upsert(office).unwrap();

        book.remove(&home_id).unwrap();

        assert_eq!(count_defaults(&book), 1);
        assert_eq!(book.default_address().unwrap().id, office_id);
    }

    #[test]
    fn test_unknown_ids_error() {
        let mut book = AddressBook::new();
        assert!(matches!(
            book.set_default("nope"),
            Err(CoreError::AddressNotFound(_))
        ));
        assert!(matches!(
            book.remove("nope"),
            Err(CoreError::AddressNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_address_rejected() {
        let mut book = AddressBook::new();
        let mut bad = test_address("Home");
        bad.recipient = "".to_string();

        assert!(matches!(
            book.upsert(bad),
            Err(CoreError::Validation(_))
        ));
        assert!(book.is_empty());
    }
}
