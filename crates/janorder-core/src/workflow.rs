//! # Order Workflow
//!
//! Explicit state machine sequencing one order cycle.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  resolve   ┌───────────┐   match    ┌──────────┐            │
//! │   │ Idle │ ─────────► │ Resolving │ ─────────► │ Resolved │            │
//! │   └──────┘            └─────┬─────┘            └────┬─────┘            │
//! │      ▲                      │ miss / no code        │ submit_quantity  │
//! │      │                      ▼                       ▼                  │
//! │      │                ┌──────────┐           ┌────────────┐            │
//! │      │                │ NotFound │           │ Validating │ ◄───┐      │
//! │      │                └──────────┘           └─────┬──────┘     │      │
//! │      │                                  ok ┌───────┴──────┐ bad │      │
//! │      │                                     ▼              ▼     │      │
//! │      │                              ┌───────────┐   ┌──────────┐│      │
//! │      │                              │ Validated │   │ Rejected │┘      │
//! │      │                              └─────┬─────┘   └──────────┘       │
//! │      │                                    │ finalize                   │
//! │      │                                    ▼                            │
//! │      │                              ┌───────────┐                      │
//! │      │                              │ Finalized │                      │
//! │      │                              └─────┬─────┘                      │
//! │      │                     append ok ┌────┴─────┐ append failed        │
//! │      │                               ▼          ▼                      │
//! │      │  at once            ┌───────────┐  ┌───────────────┐            │
//! │      ├──────────────────── │ Persisted │  │ PersistFailed │            │
//! │      │                     └───────────┘  └───────┬───────┘            │
//! │      │        next identifier (also from NotFound) │                   │
//! │      └─────────────────────────────────────────────┘                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Resolving`, `Validating` and `Persisted` are transient: they show up in
//! the transition log but the machine never rests in them. Every cycle
//! starts from `Idle`; a scan from any other resting state passes through
//! `Idle` first.
//!
//! The workflow performs no I/O. The caller fetches the catalog snapshot,
//! reads the clock and talks to the order store, then feeds the outcomes
//! in. That keeps every transition synchronous and testable.
//!
//! ## Usage
//! ```rust
//! use janorder_core::identifier::ScanOutcome;
//! use janorder_core::workflow::{OrderWorkflow, StateKind};
//! use janorder_core::{Money, ProductRecord};
//! use janorder_core::clock::{Clock, SystemClock};
//!
//! let catalog = vec![ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 5).unwrap()];
//! let mut workflow = OrderWorkflow::new();
//!
//! workflow.resolve(ScanOutcome::detected("4901234567894"), &catalog).unwrap();
//! workflow.submit_quantity(10).unwrap();
//! let record = workflow.finalize(SystemClock::new().now()).unwrap();
//! assert_eq!(record.total_price().minor(), 1200);
//!
//! // hand `record` to the order store, then report back
//! let summary = workflow.complete_persistence(Ok(())).unwrap();
//! assert_eq!(summary.total_price.minor(), 1200);
//! assert_eq!(workflow.kind(), StateKind::Idle);
//! ```

use serde::Serialize;
use std::fmt;

use crate::catalog;
use crate::error::{OrderError, OrderResult, QuantityRejection};
use crate::identifier::{normalize, ScanOutcome};
use crate::money::Money;
use crate::order;
use crate::types::{OrderRecord, OrderTimestamp, ProductRecord};
use crate::validation::{validate_quantity, ValidQuantity};

// =============================================================================
// State Kinds
// =============================================================================

/// Discriminant of [`WorkflowState`], plus the two transient states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKind {
    Idle,
    Resolving,
    Resolved,
    NotFound,
    Validating,
    Validated,
    Rejected,
    Finalized,
    Persisted,
    PersistFailed,
}

impl StateKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StateKind::Idle => "idle",
            StateKind::Resolving => "resolving",
            StateKind::Resolved => "resolved",
            StateKind::NotFound => "not_found",
            StateKind::Validating => "validating",
            StateKind::Validated => "validated",
            StateKind::Rejected => "rejected",
            StateKind::Finalized => "finalized",
            StateKind::Persisted => "persisted",
            StateKind::PersistFailed => "persist_failed",
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One edge taken by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StateKind,
    pub to: StateKind,
}

// =============================================================================
// Workflow State
// =============================================================================

/// What is left of an order once it has been handed to the order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub code: String,
    pub quantity: i64,
    pub total_price: Money,
    pub timestamp: OrderTimestamp,
}

impl From<&OrderRecord> for OrderSummary {
    fn from(record: &OrderRecord) -> Self {
        OrderSummary {
            code: record.code().to_string(),
            quantity: record.quantity(),
            total_price: record.total_price(),
            timestamp: record.timestamp(),
        }
    }
}

/// Resting states of the workflow with the data each one carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Resolved {
        product: ProductRecord,
    },
    NotFound {
        /// `None` when the identifier source detected nothing.
        code: Option<String>,
    },
    Validated {
        product: ProductRecord,
        quantity: ValidQuantity,
    },
    Rejected {
        product: ProductRecord,
        quantity: i64,
        reason: QuantityRejection,
    },
    /// The record has left the workflow; only its summary remains.
    Finalized {
        summary: OrderSummary,
    },
    PersistFailed {
        reason: String,
    },
}

impl WorkflowState {
    pub fn kind(&self) -> StateKind {
        match self {
            WorkflowState::Idle => StateKind::Idle,
            WorkflowState::Resolved { .. } => StateKind::Resolved,
            WorkflowState::NotFound { .. } => StateKind::NotFound,
            WorkflowState::Validated { .. } => StateKind::Validated,
            WorkflowState::Rejected { .. } => StateKind::Rejected,
            WorkflowState::Finalized { .. } => StateKind::Finalized,
            WorkflowState::PersistFailed { .. } => StateKind::PersistFailed,
        }
    }

    /// The product the cycle is working on, if one is resolved.
    pub fn product(&self) -> Option<&ProductRecord> {
        match self {
            WorkflowState::Resolved { product }
            | WorkflowState::Validated { product, .. }
            | WorkflowState::Rejected { product, .. } => Some(product),
            _ => None,
        }
    }
}

// =============================================================================
// Order Workflow
// =============================================================================

/// One operator's order cycle.
///
/// ## Ownership
/// The current product lives inside the state, cloned from the snapshot
/// the caller passed to [`resolve`](Self::resolve). Nothing is cached
/// across cycles: every resolve works on whatever snapshot it is given.
#[derive(Debug)]
pub struct OrderWorkflow {
    state: WorkflowState,
    transitions: Vec<Transition>,
}

impl Default for OrderWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderWorkflow {
    pub fn new() -> Self {
        OrderWorkflow {
            state: WorkflowState::Idle,
            transitions: Vec::new(),
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    /// Returns and clears the transitions taken since the last call.
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }

    fn record(&mut self, from: StateKind, to: StateKind) {
        self.transitions.push(Transition { from, to });
    }

    fn set(&mut self, next: WorkflowState) {
        let from = self.state.kind();
        let to = next.kind();
        self.record(from, to);
        self.state = next;
    }

    /// Starts a new cycle from whatever the identifier source delivered.
    ///
    /// ## Transitions
    /// - any resting state except `Finalized` → `Idle` (when not already there)
    /// - `Idle` → `Resolving`
    /// - match → `Resolved`
    /// - miss or `NoCodeDetected` → `NotFound`
    /// - empty identifier → back to `Idle` with `InvalidIdentifier`
    ///
    /// A finalized order must be reported through
    /// [`complete_persistence`](Self::complete_persistence) first, so an
    /// in-flight record is never silently dropped.
    pub fn resolve(&mut self, scan: ScanOutcome, catalog: &[ProductRecord]) -> OrderResult<&ProductRecord> {
        let from = self.kind();
        if from == StateKind::Finalized {
            return Err(OrderError::InvalidTransition {
                from,
                action: "scan a new code",
            });
        }
        if from != StateKind::Idle {
            self.set(WorkflowState::Idle);
        }
        self.record(StateKind::Idle, StateKind::Resolving);

        let raw = match scan {
            ScanOutcome::Detected(raw) => raw,
            ScanOutcome::NoCodeDetected => {
                self.settle(StateKind::Resolving, WorkflowState::NotFound { code: None });
                return Err(OrderError::NotFound { code: None });
            }
        };

        let code = match normalize(raw) {
            Ok(code) => code,
            Err(err) => {
                self.settle(StateKind::Resolving, WorkflowState::Idle);
                return Err(err);
            }
        };

        match catalog::resolve(catalog, &code) {
            Some(product) => {
                self.settle(
                    StateKind::Resolving,
                    WorkflowState::Resolved {
                        product: product.clone(),
                    },
                );
            }
            None => {
                let code = code.into_string();
                self.settle(
                    StateKind::Resolving,
                    WorkflowState::NotFound {
                        code: Some(code.clone()),
                    },
                );
                return Err(OrderError::NotFound { code: Some(code) });
            }
        }

        match &self.state {
            WorkflowState::Resolved { product } => Ok(product),
            _ => Err(OrderError::InvalidTransition {
                from: self.kind(),
                action: "read the resolved product",
            }),
        }
    }

    /// Leaves a transient state for a resting one.
    fn settle(&mut self, transient: StateKind, next: WorkflowState) {
        self.record(transient, next.kind());
        self.state = next;
    }

    /// Validates a quantity for the resolved product.
    ///
    /// Allowed from `Resolved`, `Rejected` (correction) and `Validated`
    /// (change of mind). A refusal moves to `Rejected` and keeps the
    /// product, so the operator only re-enters the quantity.
    pub fn submit_quantity(&mut self, quantity: i64) -> OrderResult<ValidQuantity> {
        let from = self.kind();
        let product = match std::mem::replace(&mut self.state, WorkflowState::Idle) {
            WorkflowState::Resolved { product }
            | WorkflowState::Validated { product, .. }
            | WorkflowState::Rejected { product, .. } => product,
            other => {
                self.state = other;
                return Err(OrderError::InvalidTransition {
                    from,
                    action: "enter a quantity",
                });
            }
        };
        self.record(from, StateKind::Validating);

        match validate_quantity(quantity, product.min_order_unit) {
            Ok(valid) => {
                self.settle(
                    StateKind::Validating,
                    WorkflowState::Validated {
                        product,
                        quantity: valid,
                    },
                );
                Ok(valid)
            }
            Err(reason) => {
                self.settle(
                    StateKind::Validating,
                    WorkflowState::Rejected {
                        product,
                        quantity,
                        reason,
                    },
                );
                Err(OrderError::InvalidQuantity(reason))
            }
        }
    }

    /// Builds the order record and hands it out by value.
    ///
    /// The workflow keeps only an [`OrderSummary`]; the caller owns the
    /// record and passes it on to the order store. On overflow the state
    /// stays `Validated`.
    pub fn finalize(&mut self, now: OrderTimestamp) -> OrderResult<OrderRecord> {
        let record = match &self.state {
            WorkflowState::Validated { product, quantity } => order::finalize(product, *quantity, now)?,
            _ => {
                return Err(OrderError::InvalidTransition {
                    from: self.kind(),
                    action: "finalize the order",
                })
            }
        };

        self.set(WorkflowState::Finalized {
            summary: OrderSummary::from(&record),
        });
        Ok(record)
    }

    /// Reports what the order store did with the finalized record.
    ///
    /// `Ok` passes through `Persisted` straight back to `Idle` and returns
    /// the summary of the stored order. `Err(message)` moves to
    /// `PersistFailed` and is returned as [`OrderError::PersistFailed`]
    /// carrying the message verbatim. The record is gone either way; a
    /// failed order is resubmitted from scratch.
    pub fn complete_persistence(&mut self, outcome: Result<(), String>) -> OrderResult<OrderSummary> {
        let summary = match &self.state {
            WorkflowState::Finalized { summary } => summary.clone(),
            _ => {
                return Err(OrderError::InvalidTransition {
                    from: self.kind(),
                    action: "record persistence",
                })
            }
        };

        match outcome {
            Ok(()) => {
                self.record(StateKind::Finalized, StateKind::Persisted);
                self.settle(StateKind::Persisted, WorkflowState::Idle);
                Ok(summary)
            }
            Err(reason) => {
                self.set(WorkflowState::PersistFailed {
                    reason: reason.clone(),
                });
                Err(OrderError::PersistFailed(reason))
            }
        }
    }

    /// Abandons the current cycle.
    pub fn reset(&mut self) {
        if self.kind() != StateKind::Idle {
            self.set(WorkflowState::Idle);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
