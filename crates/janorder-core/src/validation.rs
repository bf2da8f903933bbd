//! # Validation Module
//!
//! Business rule validation for catalog records and order quantities.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog load (janorder-db)                                   │
//! │  └── Rows become ProductRecords through the record validators below    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Order cycle (THIS MODULE)                                    │
//! │  └── validate_quantity: positive + multiple of the minimum order unit  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL / CHECK constraints                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use janorder_core::validation::validate_quantity;
//! use janorder_core::QuantityRejection;
//!
//! assert_eq!(validate_quantity(10, 5).unwrap().get(), 10);
//! assert_eq!(
//!     validate_quantity(7, 5),
//!     Err(QuantityRejection::NotAMultiple { quantity: 7, min_order_unit: 5 })
//! );
//! ```

use crate::error::{QuantityRejection, ValidationError};
use crate::money::Money;

/// Result type for record validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest barcode we accept in a catalog (GTIN-14 plus slack for add-ons).
pub const MAX_CODE_LEN: usize = 32;

/// Longest product name accepted from a catalog.
pub const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Quantity
// =============================================================================

/// A quantity that has passed [`validate_quantity`].
///
/// Only this module can construct one, so the order calculator can take it
/// as proof of validation instead of checking again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ValidQuantity(i64);

impl ValidQuantity {
    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

/// Checks a requested quantity against a product's minimum order unit.
///
/// ## Rules
/// - `quantity <= 0` → [`QuantityRejection::NonPositive`]
/// - `quantity % min_order_unit != 0` → [`QuantityRejection::NotAMultiple`]
/// - otherwise valid; nothing is rounded or clamped
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product: Widget, minimum order unit 5                                  │
/// │                                                                         │
/// │  Operator enters 7                                                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(7, 5) ← THIS FUNCTION                               │
/// │       │                                                                 │
/// │       ├── 7 <= 0?      no                                               │
/// │       ├── 7 % 5 != 0?  yes → NotAMultiple, operator re-enters          │
/// │       │                      (the product stays resolved)              │
/// │       └── 10 → Valid → order can be finalized                          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// `min_order_unit` is positive for every [`ProductRecord`](crate::ProductRecord);
/// a non-positive unit is treated as 1 so the function stays total.
pub fn validate_quantity(quantity: i64, min_order_unit: i64) -> Result<ValidQuantity, QuantityRejection> {
    if quantity <= 0 {
        return Err(QuantityRejection::NonPositive { quantity });
    }

    let unit = min_order_unit.max(1);
    if quantity % unit != 0 {
        return Err(QuantityRejection::NotAMultiple {
            quantity,
            min_order_unit: unit,
        });
    }

    Ok(ValidQuantity(quantity))
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a catalog product code.
///
/// Only emptiness and length are checked; digit and check-digit rules are
/// informational (see [`crate::identifier::Symbology`]).
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Example
/// ```rust
/// use janorder_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Widget").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free samples).
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a minimum order unit.
pub fn validate_min_order_unit(unit: i64) -> ValidationResult<()> {
    if unit <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "min_order_unit".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
