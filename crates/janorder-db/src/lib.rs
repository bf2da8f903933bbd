//! # janorder-db: Storage Adapters for JAN Order Desk
//!
//! SQLite implementations of the engine's Catalog Store and Order Store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        JAN Order Desk Data Flow                         │
//! │                                                                         │
//! │  OrderDesk::scan / OrderDesk::place_order                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   janorder-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌─────────────────────┐  ┌────────────┐ │   │
//! │  │   │   Database    │    │    Repositories     │  │ Migrations │ │   │
//! │  │   │   (pool.rs)   │◄───│ CatalogRepository   │  │ (embedded) │ │   │
//! │  │   │  SqlitePool   │    │ OrderHistoryRepo.   │  │ 001_*.sql  │ │   │
//! │  │   └───────────────┘    └─────────────────────┘  └────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <data dir>/orders.db                                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use janorder_core::ports::{CatalogSource, OrderSink};
//! use janorder_db::{Database, DbConfig};
//!
//! let db = Database::open(DbConfig::new("orders.db")).await?;
//! let snapshot = db.catalog().fetch_snapshot("product-master").await?;
//! db.orders("order-history").append(record).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

pub use repository::catalog::CatalogRepository;
pub use repository::order_history::{OrderHistoryEntry, OrderHistoryRepository};
