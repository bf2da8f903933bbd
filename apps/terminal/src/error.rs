//! # Terminal Errors
//!
//! Fatal errors that end the terminal process.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ConfigError ──┐                                                        │
//! │  DbError ──────┼──► TerminalError ──► main prints it, exit code 1      │
//! │  io::Error ────┘                                                        │
//! │                                                                         │
//! │  OrderError is NOT here: every order outcome is shown to the           │
//! │  operator and the session continues.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use thiserror::Error;

use janorder_db::DbError;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidEnv { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No home directory, so no default config or data location.
    #[error("Cannot determine the platform data directory; set database.path or JANORDER_DB_PATH")]
    NoProjectDirs,
}

/// Top-level terminal error.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Console I/O error: {0}")]
    Io(#[from] std::io::Error),
}
