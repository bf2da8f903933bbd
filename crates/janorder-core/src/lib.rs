//! # janorder-core: Order Resolution & Validation Engine
//!
//! Everything that decides whether a scanned code becomes an order, as pure
//! functions and one explicit state machine. No I/O lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       JAN Order Desk Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Operator terminal (apps/terminal)              │   │
//! │  │    scan/type code ──► quantity ──► confirm ──► receipt          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ OrderDesk                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ janorder-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌─────────┐ ┌────────────┐ ┌───────┐ ┌────────┐ │   │
//! │  │  │ identifier │ │ catalog │ │ validation │ │ order │ │workflow│ │   │
//! │  │  │ normalize  │ │ resolve │ │  quantity  │ │ total │ │  FSM   │ │   │
//! │  │  └────────────┘ └─────────┘ └────────────┘ └───────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   ports: CatalogSource, OrderSink, Clock                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   janorder-db (storage adapters)                │   │
//! │  │          catalog snapshots, order history, migrations           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`identifier`] - Code normalization, retail symbologies, check digits
//! - [`catalog`] - Exact-match lookup in a catalog snapshot
//! - [`validation`] - Quantity and catalog record rules
//! - [`order`] - Total computation and order record assembly
//! - [`workflow`] - The order cycle state machine
//! - [`ports`] / [`clock`] - Collaborator interfaces
//! - [`money`] / [`types`] / [`error`] - Shared vocabulary
//!
//! ## Example Usage
//!
//! ```rust
//! use janorder_core::catalog::resolve;
//! use janorder_core::identifier::normalize;
//! use janorder_core::validation::validate_quantity;
//! use janorder_core::{Money, ProductRecord};
//!
//! let catalog = vec![ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 5).unwrap()];
//!
//! let widget = resolve(&catalog, &normalize("4901234567894").unwrap()).unwrap();
//! assert!(validate_quantity(10, widget.min_order_unit).is_ok());
//! assert!(validate_quantity(7, widget.min_order_unit).is_err());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod clock;
pub mod error;
pub mod identifier;
pub mod money;
pub mod order;
pub mod ports;
pub mod types;
pub mod validation;
pub mod workflow;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{OrderError, OrderResult, QuantityRejection, ValidationError};
pub use identifier::{NormalizedCode, RawIdentifier, ScanOutcome, Symbology};
pub use money::Money;
pub use types::*;
pub use validation::ValidQuantity;
pub use workflow::{OrderWorkflow, StateKind, WorkflowState};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Catalog read when nothing else is configured.
pub const DEFAULT_CATALOG_ID: &str = "product-master";

/// Order ledger written when nothing else is configured.
pub const DEFAULT_LEDGER_ID: &str = "order-history";
