//! # Storage Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError ──► OrderDesk ──► CatalogUnavailable (fetch_snapshot)          │
//! │                       └──► PersistFailed      (append)                  │
//! │                                                                         │
//! │  The desk keeps the Display text, so it is written for the operator.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Everything a catalog or ledger operation can fail with.
#[derive(Debug, Error)]
pub enum DbError {
    /// `UNIQUE constraint failed: <table>.<column>`, e.g. a catalog position
    /// taken by a concurrent insert.
    #[error("{constraint} is already taken")]
    Duplicate { constraint: String },

    /// A CHECK, NOT NULL or trigger rejected the row.
    #[error("Row rejected by the database: {0}")]
    Rejected(String),

    /// Cannot open the file, or the pool was closed.
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Database busy, no free connection")]
    Busy,

    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// Stored data that no longer parses (hand-edited database).
    #[error("Malformed {table} row {key}: {reason}")]
    MalformedRow {
        table: &'static str,
        key: String,
        reason: String,
    },

    #[error("Query failed: {0}")]
    Query(String),
}

impl DbError {
    /// True when retrying later could succeed without changing the data.
    pub fn is_transient(&self) -> bool {
        matches!(self, DbError::Busy | DbError::Unavailable(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if let Some(constraint) = message.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::Duplicate {
                        constraint: constraint.to_string(),
                    }
                } else if db_err.is_check_violation()
                    || message.contains("constraint failed")
                    || db_err.code().as_deref() == Some("1811")
                {
                    DbError::Rejected(message.to_string())
                } else {
                    DbError::Query(message.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::Busy,
            sqlx::Error::PoolClosed => DbError::Unavailable("connection pool is closed".to_string()),
            sqlx::Error::Io(e) => DbError::Unavailable(e.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_map() {
        let busy = DbError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(busy, DbError::Busy));
        assert!(busy.is_transient());

        let closed = DbError::from(sqlx::Error::PoolClosed);
        assert_eq!(closed.to_string(), "Database unavailable: connection pool is closed");
        assert!(closed.is_transient());
    }

    #[test]
    fn test_other_errors_are_query_failures() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Query(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_malformed_row_message() {
        let err = DbError::MalformedRow {
            table: "order_history",
            key: "abc".to_string(),
            reason: "bad timestamp".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed order_history row abc: bad timestamp");
    }
}
