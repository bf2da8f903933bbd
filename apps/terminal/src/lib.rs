//! # JAN Order Desk Terminal
//!
//! Operator console for looking up products by JAN/EAN code, validating an
//! order quantity, and recording the order in the local order history.
//!
//! ## Module Organization
//! ```text
//! janorder_terminal/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── config.rs       ◄─── terminal.toml + JANORDER_* overrides
//! ├── console.rs      ◄─── Line input → commands → operator messages
//! ├── desk.rs         ◄─── OrderDesk: workflow + catalog + ledger + clock
//! └── error.rs        ◄─── Fatal terminal errors
//! ```

pub mod config;
pub mod console;
pub mod desk;
pub mod error;

use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::TerminalConfig;
use desk::OrderDesk;
use error::TerminalError;
use janorder_core::clock::SystemClock;
use janorder_db::{Database, DbConfig};

/// Runs the terminal against stdin/stdout until the operator quits.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Terminal Startup                                  │
/// │                                                                         │
/// │  1. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config path, else <config dir>/terminal.toml if present        │
/// │     • JANORDER_* environment variables override the file               │
/// │                                                                         │
/// │  2. Open Database ────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  3. Build OrderDesk ──────────────────────────────────────────────────► │
/// │     • catalog repository (snapshot per scan)                            │
/// │     • order history repository for the configured ledger               │
/// │     • system clock                                                      │
/// │                                                                         │
/// │  4. Run Console Session ──────────────────────────────────────────────► │
/// │     • stdin lines drive the workflow until :quit or EOF                 │
/// │                                                                         │
/// │  5. Close Database                                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> Result<(), TerminalError> {
    let config = TerminalConfig::load(config_path.as_deref())?;
    let db_path = config.database_path()?;
    info!(?db_path, catalog = %config.catalog.id, ledger = %config.ledger.id, "Starting JAN Order Desk");

    let db = Database::open(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let history = db.orders(&config.ledger.id);
    let mut desk = OrderDesk::new(
        db.catalog(),
        db.orders(&config.ledger.id),
        SystemClock::new(),
        config.catalog.id.clone(),
    );

    let outcome = console::run_session(
        &mut desk,
        &history,
        &config,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await;

    db.close().await;
    info!("Session ended");
    outcome
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with console prompts.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=janorder=trace` - Show trace for janorder crates only
/// - Default: INFO, with workflow transitions at DEBUG
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,janorder=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
