//! # Ports
//!
//! Interfaces to the collaborators the engine never touches itself.
//!
//! ```text
//! ┌──────────────────┐   fetch_snapshot    ┌──────────────────────────────┐
//! │  CatalogSource   │ ──────────────────► │                              │
//! └──────────────────┘  Vec<ProductRecord> │   Orchestrator (terminal)    │
//! ┌──────────────────┐                     │   drives OrderWorkflow       │
//! │  OrderSink       │ ◄────────────────── │                              │
//! └──────────────────┘  append(OrderRecord)└──────────────────────────────┘
//! ```
//!
//! Storage adapters (`janorder-db`) and test fakes implement these. Errors
//! stay adapter-specific; the orchestrator maps them to
//! [`OrderError::CatalogUnavailable`](crate::OrderError::CatalogUnavailable)
//! and [`OrderError::PersistFailed`](crate::OrderError::PersistFailed).

use std::future::Future;

use crate::types::{OrderRecord, ProductRecord};

/// Read side: point-in-time catalog snapshots.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns every product of `catalog_id` in snapshot order.
    fn fetch_snapshot(&self, catalog_id: &str) -> impl Future<Output = Result<Vec<ProductRecord>, Self::Error>> + Send;
}

/// Write side: the append-only order ledger.
pub trait OrderSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Appends one finalized order. Takes ownership; a failed append must
    /// leave nothing behind.
    fn append(&self, record: OrderRecord) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
