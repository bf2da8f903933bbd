//! # Order Desk
//!
//! Drives one [`OrderWorkflow`] with real collaborators.
//!
//! ## One Order Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  scan(outcome)                                                          │
//! │    ├── CatalogSource::fetch_snapshot(catalog_id)   fresh every cycle    │
//! │    │      └── failure → CatalogUnavailable, back to idle                │
//! │    └── workflow.resolve(outcome, &snapshot)                             │
//! │                                                                         │
//! │  enter_quantity(q)                                                      │
//! │    └── workflow.submit_quantity(q) → QuantityPreview                    │
//! │                                                                         │
//! │  place_order()                                                          │
//! │    ├── workflow.finalize(clock.now())  → OrderRecord (owned)            │
//! │    ├── OrderSink::append(record)       record moves into the store      │
//! │    └── workflow.complete_persistence(outcome)                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The desk never retries. A failed catalog fetch or append is reported
//! and the operator decides what to do next.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use janorder_core::clock::Clock;
use janorder_core::ports::{CatalogSource, OrderSink};
use janorder_core::workflow::OrderSummary;
use janorder_core::{
    Money, OrderError, OrderRecord, OrderResult, OrderTimestamp, OrderWorkflow, ProductRecord, ScanOutcome,
    StateKind, Symbology, WorkflowState,
};

// =============================================================================
// Desk Outputs
// =============================================================================

/// What the operator is shown before confirming an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityPreview {
    pub code: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

/// Confirmation of a persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub timestamp: OrderTimestamp,
    pub code: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: Money,
}

impl From<&OrderRecord> for Receipt {
    fn from(record: &OrderRecord) -> Self {
        Receipt {
            timestamp: record.timestamp(),
            code: record.code().to_string(),
            product_name: record.product_name().to_string(),
            quantity: record.quantity(),
            total_price: record.total_price(),
        }
    }
}

// =============================================================================
// Order Desk
// =============================================================================

/// One operator's order desk.
pub struct OrderDesk<C, O, K> {
    catalog: C,
    sink: O,
    clock: K,
    catalog_id: String,
    workflow: OrderWorkflow,
    last_order: Option<OrderSummary>,
}

impl<C, O, K> OrderDesk<C, O, K>
where
    C: CatalogSource,
    O: OrderSink,
    K: Clock,
{
    pub fn new(catalog: C, sink: O, clock: K, catalog_id: impl Into<String>) -> Self {
        OrderDesk {
            catalog,
            sink,
            clock,
            catalog_id: catalog_id.into(),
            workflow: OrderWorkflow::new(),
            last_order: None,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        self.workflow.state()
    }

    pub fn kind(&self) -> StateKind {
        self.workflow.kind()
    }

    pub fn catalog_id(&self) -> &str {
        &self.catalog_id
    }

    /// Starts a cycle with whatever the identifier source delivered.
    pub async fn scan(&mut self, scan: ScanOutcome) -> OrderResult<ProductRecord> {
        let snapshot = match self.catalog.fetch_snapshot(&self.catalog_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(catalog_id = %self.catalog_id, error = %e, "Catalog fetch failed");
                if self.workflow.kind() != StateKind::Finalized {
                    self.workflow.reset();
                    self.log_transitions();
                }
                return Err(OrderError::CatalogUnavailable(e.to_string()));
            }
        };
        debug!(catalog_id = %self.catalog_id, products = snapshot.len(), "Snapshot fetched");

        let resolved = self.workflow.resolve(scan, &snapshot).cloned();
        self.log_transitions();

        match &resolved {
            Ok(product) => {
                info!(code = %product.code, name = %product.name, "Product resolved");
                warn_on_bad_check_digit(&product.code);
            }
            Err(e) => info!(outcome = e.code(), "{e}"),
        }
        resolved
    }

    /// Validates a quantity for the resolved product.
    pub fn enter_quantity(&mut self, quantity: i64) -> OrderResult<QuantityPreview> {
        let validated = self.workflow.submit_quantity(quantity);
        self.log_transitions();
        if let Err(e) = &validated {
            info!(quantity, outcome = e.code(), "{e}");
        }
        let valid = validated?;

        let product = self.workflow.state().product().ok_or(OrderError::InvalidTransition {
            from: self.workflow.kind(),
            action: "preview the order",
        })?;
        let total_price = product
            .unit_price
            .checked_mul_quantity(valid.get())
            .ok_or(OrderError::TotalOverflow {
                quantity: valid.get(),
                unit_price: product.unit_price,
            })?;

        Ok(QuantityPreview {
            code: product.code.clone(),
            product_name: product.name.clone(),
            quantity: valid.get(),
            unit_price: product.unit_price,
            total_price,
        })
    }

    /// Finalizes the validated order and appends it to the order store.
    ///
    /// `PersistFailed` means nothing was stored; the whole order has to be
    /// entered again.
    pub async fn place_order(&mut self) -> OrderResult<Receipt> {
        let finalized = self.workflow.finalize(self.clock.now());
        self.log_transitions();
        let record = finalized?;
        let receipt = Receipt::from(&record);

        let outcome = self.sink.append(record).await.map_err(|e| e.to_string());
        if let Err(reason) = &outcome {
            error!(code = %receipt.code, quantity = receipt.quantity, reason = %reason, "Order append failed");
        }

        let completed = self.workflow.complete_persistence(outcome);
        self.log_transitions();
        self.last_order = Some(completed?);

        Ok(receipt)
    }

    /// Abandons the current cycle.
    pub fn reset(&mut self) {
        self.workflow.reset();
        self.log_transitions();
    }

    /// Summary of the last order the store accepted this session.
    pub fn last_order(&self) -> Option<&OrderSummary> {
        self.last_order.as_ref()
    }

    fn log_transitions(&mut self) {
        for transition in self.workflow.take_transitions() {
            debug!(from = %transition.from, to = %transition.to, "Workflow transition");
        }
    }
}

fn warn_on_bad_check_digit(code: &str) {
    if let Some(symbology) = Symbology::detect(code) {
        if !symbology.has_valid_check_digit(code) {
            warn!(code = %code, symbology = %symbology, "Check digit does not match");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
