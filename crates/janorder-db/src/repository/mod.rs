//! # Repository Module
//!
//! SQLite implementations of the engine's storage ports.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  OrderDesk                                                             │
//! │     │  fetch_snapshot("product-master")      append(OrderRecord)       │
//! │     ▼                                          ▼                        │
//! │  CatalogRepository                      OrderHistoryRepository         │
//! │  ├── fetch_snapshot(catalog_id)         ├── append(record)             │
//! │  ├── insert(catalog_id, product)        ├── list_recent(limit)         │
//! │  └── count(catalog_id)                  └── count()                    │
//! │     │                                          │                        │
//! │     ▼                                          ▼                        │
//! │  catalog_products                       order_history                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - implements `CatalogSource`
//! - [`OrderHistoryRepository`](order_history::OrderHistoryRepository) - implements `OrderSink`

pub mod catalog;
pub mod order_history;
