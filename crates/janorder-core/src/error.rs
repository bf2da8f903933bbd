//! # Error Types
//!
//! Domain-specific error types for janorder-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  janorder-core errors (this file)                                      │
//! │  ├── OrderError         - Every outcome of an order cycle that is not  │
//! │  │                        success (business + collaborator failures)   │
//! │  ├── QuantityRejection  - Why a quantity was refused                   │
//! │  └── ValidationError    - Malformed catalog records                    │
//! │                                                                         │
//! │  janorder-db errors (separate crate)                                   │
//! │  └── DbError            - Database operation failures                  │
//! │                                                                         │
//! │  Flow: DbError ──► OrderError::CatalogUnavailable / PersistFailed      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, quantity, unit)
//! 3. Not-found and rejected quantities are ordinary variants, never panics
//! 4. Collaborator messages are carried verbatim

use thiserror::Error;

use crate::money::Money;
use crate::workflow::StateKind;

// =============================================================================
// Order Error
// =============================================================================

/// Everything that can stop an order cycle short of a persisted record.
///
/// ## Taxonomy
/// ```text
/// Local, immediately reportable   InvalidIdentifier
/// Expected business outcomes      NotFound, InvalidQuantity, TotalOverflow
/// Collaborator failures           CatalogUnavailable, PersistFailed
/// Caller misuse                   InvalidTransition
/// ```
///
/// None of these are retried by the engine. Retry policy belongs to the
/// orchestrating caller.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The raw identifier was empty after trimming.
    #[error("Product code is empty")]
    InvalidIdentifier,

    /// No catalog record matches the code.
    ///
    /// `code` is `None` when the identifier source gave up without
    /// detecting anything; that case is reported exactly like a miss.
    #[error("{}", not_found_message(.code))]
    NotFound { code: Option<String> },

    /// The requested quantity was refused by the quantity validator.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityRejection),

    /// `quantity * unit_price` does not fit the money representation.
    #[error("Order total overflows for quantity {quantity} at unit price {unit_price}")]
    TotalOverflow { quantity: i64, unit_price: Money },

    /// The catalog store could not produce a snapshot.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// The order store refused or failed the append.
    #[error("Order could not be recorded: {0}")]
    PersistFailed(String),

    /// The caller asked for a step the current workflow state does not allow.
    ///
    /// ## When This Occurs
    /// - Entering a quantity before any product was resolved
    /// - Finalizing an order whose quantity was rejected
    /// - Scanning a new code while a finalized order awaits persistence
    #[error("Cannot {action} while the order is {from}")]
    InvalidTransition { from: StateKind, action: &'static str },

    /// A catalog record failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn not_found_message(code: &Option<String>) -> String {
    match code {
        Some(code) => format!("No product found for code {code}"),
        None => "No product code detected".to_string(),
    }
}

impl OrderError {
    /// Machine-readable error code for callers that branch on the outcome.
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::InvalidIdentifier => "INVALID_IDENTIFIER",
            OrderError::NotFound { .. } => "NOT_FOUND",
            OrderError::InvalidQuantity(_) => "INVALID_QUANTITY",
            OrderError::TotalOverflow { .. } => "TOTAL_OVERFLOW",
            OrderError::CatalogUnavailable(_) => "CATALOG_UNAVAILABLE",
            OrderError::PersistFailed(_) => "PERSIST_FAILED",
            OrderError::InvalidTransition { .. } => "INVALID_TRANSITION",
            OrderError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// True when the operator can fix the problem by re-entering input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            OrderError::InvalidIdentifier
                | OrderError::NotFound { .. }
                | OrderError::InvalidQuantity(_)
                | OrderError::TotalOverflow { .. }
        )
    }
}

// =============================================================================
// Quantity Rejection
// =============================================================================

/// Why a requested quantity was refused.
///
/// The two reasons are kept apart so the operator can be told whether to
/// enter a positive number or to round to the ordering unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityRejection {
    /// Zero or negative quantity.
    #[error("quantity {quantity} must be positive")]
    NonPositive { quantity: i64 },

    /// Quantity is not an exact multiple of the minimum order unit.
    #[error("quantity {quantity} must be a multiple of the minimum order unit ({min_order_unit})")]
    NotAMultiple { quantity: i64, min_order_unit: i64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Catalog record validation errors.
///
/// Raised when a row from the catalog store cannot become a
/// [`ProductRecord`](crate::types::ProductRecord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with OrderError.
pub type OrderResult<T> = Result<T, OrderError>;

// =============================================================================
// Unit Tests
// =============================================================================
