//! # Terminal Configuration
//!
//! Settings loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  4. Environment (JANORDER_*)          ◄── wins                         │
//! │  3. TOML file (--config PATH, or <config dir>/terminal.toml)           │
//! │  2. Defaults (this file)                                               │
//! │  ─────────────────────────────────────────────────────────────────     │
//! │  then validate()                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example `terminal.toml`
//! ```toml
//! [database]
//! path = "/srv/janorder/orders.db"
//!
//! [catalog]
//! id = "product-master"
//!
//! [ledger]
//! id = "order-history"
//!
//! [scanner]
//! timeout_secs = 10
//!
//! [currency]
//! code = "JPY"
//! symbol = "¥"
//! decimals = 0
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ConfigError;
use janorder_core::{Money, DEFAULT_CATALOG_ID, DEFAULT_LEDGER_ID};

/// Name of the config file looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "terminal.toml";

/// Database file name inside the platform data directory.
pub const DEFAULT_DB_FILE_NAME: &str = "orders.db";

const MAX_CURRENCY_DECIMALS: u8 = 4;

// =============================================================================
// Configuration Types
// =============================================================================

/// Complete terminal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerminalConfig {
    pub database: DatabaseSection,
    pub catalog: CatalogSection,
    pub ledger: LedgerSection,
    pub scanner: ScannerSection,
    pub currency: CurrencySection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    /// SQLite file. `None` means `<platform data dir>/orders.db`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    /// Catalog snapshots are read from.
    pub id: String,
}

impl Default for CatalogSection {
    fn default() -> Self {
        CatalogSection {
            id: DEFAULT_CATALOG_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerSection {
    /// Order ledger finalized orders are appended to.
    pub id: String,
}

impl Default for LedgerSection {
    fn default() -> Self {
        LedgerSection {
            id: DEFAULT_LEDGER_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerSection {
    /// How long an armed scan waits for a code. `None` waits forever.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencySection {
    /// ISO 4217 code, informational.
    pub code: String,
    pub symbol: String,
    /// Minor unit digits (JPY 0, USD 2).
    pub decimals: u8,
}

impl Default for CurrencySection {
    fn default() -> Self {
        CurrencySection {
            code: "JPY".to_string(),
            symbol: "¥".to_string(),
            decimals: 0,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

impl TerminalConfig {
    /// Loads defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist. Without one, the platform config
    /// file is used only if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    TerminalConfig::default()
                }
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!(
            catalog = %config.catalog.id,
            ledger = %config.ledger.id,
            currency = %config.currency.code,
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Reading config file");
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies `JANORDER_*` overrides.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("JANORDER_DB_PATH") {
            self.database.path = Some(PathBuf::from(path));
        }
        if let Some(id) = lookup("JANORDER_CATALOG_ID") {
            self.catalog.id = id;
        }
        if let Some(id) = lookup("JANORDER_LEDGER_ID") {
            self.ledger.id = id;
        }
        if let Some(secs) = lookup("JANORDER_SCAN_TIMEOUT_SECS") {
            self.scanner.timeout_secs = Some(parse_env("JANORDER_SCAN_TIMEOUT_SECS", &secs)?);
        }
        if let Some(symbol) = lookup("JANORDER_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }
        if let Some(decimals) = lookup("JANORDER_CURRENCY_DECIMALS") {
            self.currency.decimals = parse_env("JANORDER_CURRENCY_DECIMALS", &decimals)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.id.trim().is_empty() {
            return Err(ConfigError::Invalid("catalog.id must not be empty".to_string()));
        }
        if self.ledger.id.trim().is_empty() {
            return Err(ConfigError::Invalid("ledger.id must not be empty".to_string()));
        }
        if self.scanner.timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "scanner.timeout_secs must be at least 1 (omit it to wait forever)".to_string(),
            ));
        }
        if self.currency.decimals > MAX_CURRENCY_DECIMALS {
            return Err(ConfigError::Invalid(format!(
                "currency.decimals must be at most {MAX_CURRENCY_DECIMALS}"
            )));
        }
        Ok(())
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    /// The database file, falling back to the platform data directory.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => project_dirs()
                .map(|dirs| dirs.data_dir().join(DEFAULT_DB_FILE_NAME))
                .ok_or(ConfigError::NoProjectDirs),
        }
    }

    pub fn scan_timeout(&self) -> Option<Duration> {
        self.scanner.timeout_secs.map(Duration::from_secs)
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust
    /// use janorder_core::Money;
    /// use janorder_terminal::config::TerminalConfig;
    ///
    /// let config = TerminalConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(1200)), "¥1,200");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let magnitude = Money::from_minor(amount.minor().saturating_abs());
        format!(
            "{}{}{}",
            sign,
            self.currency.symbol,
            magnitude.format_grouped(self.currency.decimals)
        )
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "janorder", "desk")
}

/// `<platform config dir>/terminal.toml`
///
/// - **Linux**: `~/.config/desk/terminal.toml`
/// - **macOS**: `~/Library/Application Support/com.janorder.desk/terminal.toml`
/// - **Windows**: `%APPDATA%\janorder\desk\config\terminal.toml`
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.catalog.id, "product-master");
        assert_eq!(config.ledger.id, "order-history");
        assert_eq!(config.scan_timeout(), None);
        assert_eq!(config.currency.code, "JPY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TerminalConfig::from_toml_str(
            r#"
            [scanner]
            timeout_secs = 10

            [currency]
            code = "USD"
            symbol = "$"
            decimals = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.scan_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.catalog.id, "product-master");
        assert_eq!(config.format_currency(Money::from_minor(123456)), "$1,234.56");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(matches!(
            TerminalConfig::from_toml_str("[catalog]\nsheet = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = TerminalConfig::from_toml_str("[catalog]\nid = \"from-file\"\n").unwrap();
        config
            .apply_overrides(env(&[
                ("JANORDER_CATALOG_ID", "from-env"),
                ("JANORDER_DB_PATH", "/tmp/janorder/orders.db"),
                ("JANORDER_SCAN_TIMEOUT_SECS", " 5 "),
                ("JANORDER_CURRENCY_DECIMALS", "2"),
            ]))
            .unwrap();

        assert_eq!(config.catalog.id, "from-env");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/janorder/orders.db"));
        assert_eq!(config.scanner.timeout_secs, Some(5));
        assert_eq!(config.currency.decimals, 2);
    }

    #[test]
    fn test_bad_env_value() {
        let mut config = TerminalConfig::default();
        let err = config
            .apply_overrides(env(&[("JANORDER_SCAN_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'soon' for JANORDER_SCAN_TIMEOUT_SECS"
        );
    }

    #[test]
    fn test_validation() {
        let mut config = TerminalConfig::default();
        config.ledger.id = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = TerminalConfig::default();
        config.scanner.timeout_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = TerminalConfig::default();
        config.currency.decimals = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        let config = TerminalConfig::default();
        assert_eq!(config.format_currency(Money::from_minor(0)), "¥0");
        assert_eq!(config.format_currency(Money::from_minor(1200)), "¥1,200");
        assert_eq!(config.format_currency(Money::from_minor(-1234567)), "-¥1,234,567");
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = TerminalConfig::load(Some(Path::new("/nonexistent/janorder/terminal.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
