//! Ledger configuration loading from config.toml
//!
//! This module loads display and filter settings from a TOML configuration file.
//! Every key is optional; a missing file yields the defaults, which match the
//! behaviour of the original order page (peso prices, US-style dates, every
//! category showing `ALL`).

use crate::core::filter::{Filters, StatusFilter};
use crate::core::order::Game;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Symbol printed in front of every price
    pub currency_symbol: String,
    /// `chrono` format string for the creation date column
    pub date_format: String,
    /// Initial status filter of each category
    pub filters: FilterConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₱".to_string(),
            date_format: "%-m/%-d/%Y".to_string(),
            filters: FilterConfig::default(),
        }
    }
}

/// Initial filter per category, written as `"ALL"` or a status name
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    /// Filter applied to the Roblox table
    pub roblox: StatusFilter,
    /// Filter applied to the ML table
    pub ml: StatusFilter,
}

impl FilterConfig {
    /// Builds the runtime filter map from the configured values.
    #[must_use]
    pub fn to_filters(self) -> Filters {
        let mut filters = Filters::default();
        filters.set(Game::Roblox, self.roblox);
        filters.set(Game::Ml, self.ml);
        filters
    }
}

/// Loads ledger configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A filter names an unknown status
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<LedgerConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {path_ref:?}: {e}"),
    })
}

/// Loads configuration from `ORDER_LEDGER_CONFIG` or `./config.toml`.
///
/// A missing file is not an error: the defaults are returned instead.
pub fn load_default_config() -> Result<LedgerConfig> {
    let path = std::env::var("ORDER_LEDGER_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        tracing::info!("No configuration file at {}, using defaults", path);
        return Ok(LedgerConfig::default());
    }

    load_config(path)
}
