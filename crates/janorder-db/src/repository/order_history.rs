//! # Order History Repository
//!
//! The append-only order ledger (`order_history` table).
//!
//! ## Append Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderRecord ──► append ──► ONE INSERT statement                        │
//! │                                                                         │
//! │  id │ ledger_id │ timestamp │ code │ product_name │ quantity │ total    │
//! │                 └──────────── persisted field order ───────────────┘    │
//! │                                                                         │
//! │  Success → exactly one row.   Failure → no row at all.                  │
//! │  (A single-statement write is atomic in SQLite.)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use janorder_core::ports::OrderSink;
use janorder_core::{Money, OrderRecord, OrderTimestamp};

/// One persisted order as read back from the ledger.
///
/// Separate from [`OrderRecord`], which only the order calculator may
/// create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistoryEntry {
    #[serde(skip)]
    pub id: String,
    pub timestamp: OrderTimestamp,
    pub code: String,
    pub product_name: String,
    pub quantity: i64,
    pub total_price: Money,
}

impl OrderHistoryEntry {
    /// Renders the entry as one tabular row, in persisted field order.
    pub fn to_row(&self) -> [String; 5] {
        [
            self.timestamp.to_string(),
            self.code.clone(),
            self.product_name.clone(),
            self.quantity.to_string(),
            self.total_price.minor().to_string(),
        ]
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderHistoryRow {
    id: String,
    timestamp: String,
    code: String,
    product_name: String,
    quantity: i64,
    total_price: i64,
}

impl TryFrom<OrderHistoryRow> for OrderHistoryEntry {
    type Error = DbError;

    fn try_from(row: OrderHistoryRow) -> Result<Self, Self::Error> {
        let timestamp = OrderTimestamp::parse(&row.timestamp)
            .map_err(|e| DbError::MalformedRow {
                table: "order_history",
                key: row.id.clone(),
                reason: format!("timestamp '{}': {e}", row.timestamp),
            })?;

        Ok(OrderHistoryEntry {
            id: row.id,
            timestamp,
            code: row.code,
            product_name: row.product_name,
            quantity: row.quantity,
            total_price: Money::from_minor(row.total_price),
        })
    }
}

/// Repository for one order ledger.
#[derive(Debug, Clone)]
pub struct OrderHistoryRepository {
    pool: SqlitePool,
    ledger_id: String,
}

impl OrderHistoryRepository {
    pub fn new(pool: SqlitePool, ledger_id: impl Into<String>) -> Self {
        OrderHistoryRepository {
            pool,
            ledger_id: ledger_id.into(),
        }
    }

    pub fn ledger_id(&self) -> &str {
        &self.ledger_id
    }

    /// Most recent orders first, at most `limit`.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<OrderHistoryEntry>> {
        let rows: Vec<OrderHistoryRow> = sqlx::query_as(
            r#"
            SELECT id, timestamp, code, product_name, quantity, total_price
            FROM order_history
            WHERE ledger_id = ?1
            ORDER BY timestamp DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(&self.ledger_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderHistoryEntry::try_from).collect()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_history WHERE ledger_id = ?1")
            .bind(&self.ledger_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

impl OrderSink for OrderHistoryRepository {
    type Error = DbError;

    async fn append(&self, record: OrderRecord) -> Result<(), DbError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO order_history (id, ledger_id, timestamp, code, product_name, quantity, total_price)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&self.ledger_id)
        .bind(record.timestamp().to_string())
        .bind(record.code())
        .bind(record.product_name())
        .bind(record.quantity())
        .bind(record.total_price().minor())
        .execute(&self.pool)
        .await?;

        debug!(id = %id, ledger_id = %self.ledger_id, "Order row written");
        info!(
            code = %record.code(),
            quantity = record.quantity(),
            total = record.total_price().minor(),
            "Order recorded"
        );
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use janorder_core::order::finalize;
    use janorder_core::validation::validate_quantity;
    use janorder_core::ProductRecord;

    fn record_at(second: u32, quantity: i64) -> OrderRecord {
        let widget = ProductRecord::new("4901234567894", "Widget", Money::from_minor(120), 5).unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(12, 0, second)
            .unwrap();
        finalize(
            &widget,
            validate_quantity(quantity, 5).unwrap(),
            OrderTimestamp::from_datetime(at),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_append_writes_one_row_in_field_order() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let orders = db.orders("order-history");

        orders.append(record_at(0, 10)).await.unwrap();

        assert_eq!(orders.count().await.unwrap(), 1);
        let entries = orders.list_recent(10).await.unwrap();
        assert_eq!(
            entries[0].to_row(),
            ["2024-03-09 12:00:00", "4901234567894", "Widget", "10", "1200"]
        );
        let json = serde_json::to_string(&entries[0]).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":"2024-03-09 12:00:00","code":"4901234567894","productName":"Widget","quantity":10,"totalPrice":1200}"#
        );
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let orders = db.orders("order-history");

        orders.append(record_at(1, 5)).await.unwrap();
        orders.append(record_at(3, 15)).await.unwrap();
        orders.append(record_at(2, 10)).await.unwrap();

        let quantities: Vec<i64> = orders
            .list_recent(2)
            .await
            .unwrap()
            .iter()
            .map(|e| e.quantity)
            .collect();
        assert_eq!(quantities, [15, 10]);
    }

    #[tokio::test]
    async fn test_ledgers_are_isolated() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();

        db.orders("order-history").append(record_at(0, 10)).await.unwrap();

        assert_eq!(db.orders("training").count().await.unwrap(), 0);
        assert!(db.orders("training").list_recent(10).await.unwrap().is_empty());
        assert_eq!(db.orders("order-history").ledger_id(), "order-history");
    }

    #[tokio::test]
    async fn test_failed_append_leaves_nothing() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let orders = db.orders("order-history");
        sqlx::query(
            "CREATE TRIGGER lock_ledger BEFORE INSERT ON order_history
             BEGIN SELECT RAISE(ABORT, 'ledger is locked'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = orders.append(record_at(0, 10)).await.unwrap_err();
        assert!(err.to_string().contains("ledger is locked"));
        assert_eq!(orders.count().await.unwrap(), 0);

        sqlx::query("DROP TRIGGER lock_ledger").execute(db.pool()).await.unwrap();
        orders.append(record_at(0, 10)).await.unwrap();
        assert_eq!(orders.count().await.unwrap(), 1);
    }
}
