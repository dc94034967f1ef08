//! # Validation Module
//!
//! Field validation for user-entered records.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell forms (TypeScript)                                     │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                           │
//! │  ├── Enforced by AddressBook::upsert before any mutation               │
//! │  └── The collection never holds an invalid record                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bazaar_core::validation::{validate_phone, validate_postal_code};
//!
//! validate_phone("+92 300 1234567").unwrap();
//! validate_postal_code("54000").unwrap();
//! ```

use crate::address::Address;
use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an address label ("Home", "Office").
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 40 characters
pub fn validate_label(label: &str) -> ValidationResult<()> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "label".to_string(),
        });
    }
    if label.chars().count() > 40 {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: 40,
        });
    }
    Ok(())
}

/// Validates a recipient name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_recipient(recipient: &str) -> ValidationResult<()> {
    let recipient = recipient.trim();

    if recipient.is_empty() {
        return Err(ValidationError::Required {
            field: "recipient".to_string(),
        });
    }
    if recipient.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "recipient".to_string(),
            max: 100,
        });
    }
    Ok(())
}

/// Validates a contact phone number.
///
/// ## Rules
/// - Must not be empty
/// - Digits, spaces, hyphens and a leading `+` only
/// - 7 to 15 digits (E.164 upper bound)
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    if !body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, hyphens, and a leading +".to_string(),
        });
    }

    let digits = body.chars().filter(char::is_ascii_digit).count() as i64;
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: 7,
            max: 15,
        });
    }
    Ok(())
}

/// Validates a street line.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 200 characters
pub fn validate_street_line(line: &str) -> ValidationResult<()> {
    let line = line.trim();

    if line.is_empty() {
        return Err(ValidationError::Required {
            field: "line1".to_string(),
        });
    }
    if line.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "line1".to_string(),
            max: 200,
        });
    }
    Ok(())
}

/// Validates a city name.
pub fn validate_city(city: &str) -> ValidationResult<()> {
    let city = city.trim();

    if city.is_empty() {
        return Err(ValidationError::Required {
            field: "city".to_string(),
        });
    }
    if city.chars().count() > 80 {
        return Err(ValidationError::TooLong {
            field: "city".to_string(),
            max: 80,
        });
    }
    Ok(())
}

/// Validates a postal code.
///
/// ## Rules
/// - Must not be empty
/// - Alphanumeric with optional spaces/hyphens, at most 12 characters
pub fn validate_postal_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "postal_code".to_string(),
        });
    }
    if code.chars().count() > 12 {
        return Err(ValidationError::TooLong {
            field: "postal_code".to_string(),
            max: 12,
        });
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == ' ' || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "postal_code".to_string(),
            reason: "must contain only letters, numbers, spaces, and hyphens".to_string(),
        });
    }
    Ok(())
}

/// Validates every user-entered field of an address.
///
/// Called by `AddressBook::upsert` so an invalid record never lands in
/// the collection.
pub fn validate_address_fields(address: &Address) -> ValidationResult<()> {
    validate_label(&address.label)?;
    validate_recipient(&address.recipient)?;
    validate_phone(&address.phone)?;
    validate_street_line(&address.line1)?;
    validate_city(&address.city)?;
    validate_postal_code(&address.postal_code)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
