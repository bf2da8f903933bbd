//! # Opening the Order Database
//!
//! One SQLite database holds every catalog and every ledger. The terminal
//! opens it once at startup and hands out repositories bound to a pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DbConfig::new(path) / DbConfig::in_memory()                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::open(config).await                                           │
//! │       │   creates the parent directory, connects, applies migrations   │
//! │       │                                                                 │
//! │       ├──► db.catalog()      → CatalogRepository       (snapshots)     │
//! │       └──► db.orders(ledger) → OrderHistoryRepository  (appends)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A file database runs in WAL mode so the `:history` listing never waits on
//! an append. The in-memory variant is one connection that lives as long as
//! the pool, since each SQLite memory connection is its own database.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::catalog::CatalogRepository;
use crate::repository::order_history::OrderHistoryRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the order database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to the process, gone on close.
    Memory,
}

impl fmt::Display for DbLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbLocation::File(path) => write!(f, "{}", path.display()),
            DbLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// How to open the order database.
///
/// ## Example
/// ```rust
/// use janorder_db::{DbConfig, DbLocation};
/// use std::time::Duration;
///
/// let config = DbConfig::new("/var/lib/janorder/orders.db").with_busy_timeout(Duration::from_secs(2));
/// assert!(matches!(config.location, DbLocation::File(_)));
/// assert_eq!(config.max_connections, 4);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// One operator needs few: a snapshot read, an append, a history listing.
    pub max_connections: u32,

    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// A database file, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// A throwaway database for tests.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            max_connections: 1,
            busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(1);
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.location == DbLocation::Memory
    }

    fn connect_options(&self) -> SqliteConnectOptions {
        let options = match &self.location {
            DbLocation::Memory => SqliteConnectOptions::new().in_memory(true),
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true),
        };
        options.foreign_keys(true).busy_timeout(self.busy_timeout)
    }

    fn pool_options(&self) -> SqlitePoolOptions {
        let pool = SqlitePoolOptions::new().max_connections(self.max_connections);
        match self.location {
            // recycling the only connection would drop every table
            DbLocation::Memory => pool.max_connections(1).max_lifetime(None).idle_timeout(None),
            DbLocation::File(_) => pool.idle_timeout(Some(Duration::from_secs(600))),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Open order database. Clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    location: DbLocation,
}

impl Database {
    /// Connects and brings the schema up to date.
    ///
    /// ## Errors
    /// * `Unavailable` - the file or its directory cannot be created or opened
    /// * `Migration` - the schema could not be applied
    pub async fn open(config: DbConfig) -> DbResult<Self> {
        info!(location = %config.location, "Opening order database");

        if let DbLocation::File(path) = &config.location {
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(|e| {
                    DbError::Unavailable(format!("cannot create {}: {e}", dir.display()))
                })?;
            }
        }

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| DbError::Unavailable(e.to_string()))?;
        debug!(max_connections = config.max_connections, "Pool connected");

        migrations::run_migrations(&pool).await?;

        Ok(Database {
            pool,
            location: config.location,
        })
    }

    pub fn location(&self) -> &DbLocation {
        &self.location
    }

    /// Raw pool, for migrations status and ad-hoc queries in tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.pool.clone())
    }

    /// Order history bound to one ledger.
    pub fn orders(&self, ledger_id: impl Into<String>) -> OrderHistoryRepository {
        OrderHistoryRepository::new(self.pool.clone(), ledger_id)
    }

    /// Waits for checked-out connections, then closes. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!(location = %self.location, "Closing order database");
        self.pool.close().await;
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
