//! # Catalog Repository
//!
//! Catalog snapshots backed by the `catalog_products` table.
//!
//! ## Snapshot Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog_products WHERE catalog_id = 'product-master'                   │
//! │                                                                         │
//! │  position │ code          │ name       │ unit_price │ min_order_unit    │
//! │  ─────────┼───────────────┼────────────┼────────────┼───────────────    │
//! │  0        │ 4901234567894 │ Widget     │ 120        │ 5                 │
//! │  1        │ 4512345678906 │ Gadget     │ 980        │ 1                 │
//! │  2        │ 4901234567894 │ Widget v2  │ 130        │ 5    ← shadowed   │
//! │                                                                         │
//! │  ORDER BY position keeps "first occurrence wins" meaningful.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows that cannot become a valid `ProductRecord` (empty name, negative
//! price, zero order unit, ...) are skipped with a warning instead of
//! failing the whole snapshot.

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use janorder_core::ports::CatalogSource;
use janorder_core::{Money, ProductRecord};

/// One stored catalog row, before validation.
#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    position: i64,
    code: String,
    name: String,
    unit_price: i64,
    min_order_unit: i64,
}

/// Repository for catalog snapshots.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Appends a product at the end of `catalog_id`.
    ///
    /// Returns the position assigned to the row. The position is computed
    /// in the same statement so concurrent inserts cannot collide silently
    /// (a clash surfaces as [`DbError::Duplicate`]).
    pub async fn insert(&self, catalog_id: &str, product: &ProductRecord) -> DbResult<i64> {
        let position: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO catalog_products (catalog_id, position, code, name, unit_price, min_order_unit)
            SELECT ?1, COALESCE(MAX(position) + 1, 0), ?2, ?3, ?4, ?5
            FROM catalog_products
            WHERE catalog_id = ?1
            RETURNING position
            "#,
        )
        .bind(catalog_id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.unit_price.minor())
        .bind(product.min_order_unit)
        .fetch_one(&self.pool)
        .await?;

        debug!(catalog_id = %catalog_id, code = %product.code, position, "Catalog product inserted");
        Ok(position)
    }

    /// Number of rows stored for `catalog_id`, valid or not.
    pub async fn count(&self, catalog_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_products WHERE catalog_id = ?1")
            .bind(catalog_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

impl CatalogSource for CatalogRepository {
    type Error = DbError;

    /// Reads every product of `catalog_id` in position order.
    ///
    /// An unknown catalog yields an empty snapshot; every code then
    /// resolves as not found.
    async fn fetch_snapshot(&self, catalog_id: &str) -> Result<Vec<ProductRecord>, DbError> {
        let rows: Vec<CatalogRow> = sqlx::query_as(
            r#"
            SELECT position, code, name, unit_price, min_order_unit
            FROM catalog_products
            WHERE catalog_id = ?1
            ORDER BY position
            "#,
        )
        .bind(catalog_id)
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let snapshot: Vec<ProductRecord> = rows
            .into_iter()
            .filter_map(|row| {
                match ProductRecord::new(row.code, row.name, Money::from_minor(row.unit_price), row.min_order_unit) {
                    Ok(product) => Some(product),
                    Err(e) => {
                        warn!(catalog_id = %catalog_id, position = row.position, error = %e, "Skipping invalid catalog row");
                        None
                    }
                }
            })
            .collect();

        debug!(catalog_id = %catalog_id, rows = total, products = snapshot.len(), "Catalog snapshot fetched");
        Ok(snapshot)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn product(code: &str, name: &str, price: i64, unit: i64) -> ProductRecord {
        ProductRecord::new(code, name, Money::from_minor(price), unit).unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_keeps_insert_order() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        assert_eq!(repo.insert("product-master", &product("4901234567894", "Widget", 120, 5)).await.unwrap(), 0);
        assert_eq!(repo.insert("product-master", &product("4512345678906", "Gadget", 980, 1)).await.unwrap(), 1);
        assert_eq!(repo.insert("product-master", &product("4901234567894", "Widget v2", 130, 5)).await.unwrap(), 2);

        let snapshot = repo.fetch_snapshot("product-master").await.unwrap();
        let names: Vec<&str> = snapshot.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Widget", "Gadget", "Widget v2"]);
        assert_eq!(snapshot[0].unit_price, Money::from_minor(120));
        assert_eq!(snapshot[0].min_order_unit, 5);
    }

    #[tokio::test]
    async fn test_catalogs_are_isolated() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();

        repo.insert("product-master", &product("4901234567894", "Widget", 120, 5)).await.unwrap();
        assert_eq!(repo.insert("seasonal", &product("96385074", "Lantern", 450, 1)).await.unwrap(), 0);

        assert_eq!(repo.count("product-master").await.unwrap(), 1);
        assert_eq!(repo.count("seasonal").await.unwrap(), 1);
        assert!(repo.fetch_snapshot("unknown").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_rows_are_skipped() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();
        repo.insert("product-master", &product("4901234567894", "Widget", 120, 5)).await.unwrap();

        // rows written by other tools are not validated on the way in
        sqlx::query(
            "INSERT INTO catalog_products (catalog_id, position, code, name, unit_price, min_order_unit) VALUES
             ('product-master', 10, '4512345678906', '', 980, 1),
             ('product-master', 11, '96385074', 'Lantern', 450, 0),
             ('product-master', 12, '  036000291452 ', 'Padded', 300, 2)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let snapshot = repo.fetch_snapshot("product-master").await.unwrap();
        let codes: Vec<&str> = snapshot.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, ["4901234567894", "036000291452"]);
        assert_eq!(repo.count("product-master").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_fetch_after_close_fails() {
        let db = Database::open(DbConfig::in_memory()).await.unwrap();
        let repo = db.catalog();
        db.close().await;

        assert!(repo.fetch_snapshot("product-master").await.is_err());
    }
}
