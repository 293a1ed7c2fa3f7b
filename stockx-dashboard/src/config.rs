//! Dashboard configuration.
//!
//! Read from TOML. Every field has a default, so an empty file (or no file at
//! all) gives the stock dashboard.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stockx_core::data::YahooOptions;
use stockx_core::{RangePreset, DEFAULT_MA_WINDOW};
use thiserror::Error;

/// File name looked up under `<config_dir>/stockx/`.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One of the fixed market indices shown above the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub label: String,
    pub symbol: String,
}

impl IndexEntry {
    pub fn new(label: &str, symbol: &str) -> Self {
        Self {
            label: label.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Fan watchlist, index, and fundamentals fetches out over rayon.
    pub parallel_fetch: bool,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let yahoo = YahooOptions::default();
        Self {
            timeout_secs: yahoo.timeout.as_secs(),
            user_agent: yahoo.user_agent,
            parallel_fetch: false,
        }
    }
}

impl ProviderConfig {
    pub fn yahoo_options(&self) -> YahooOptions {
        YahooOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Symbols offered by the multi-select.
    pub catalog: Vec<String>,
    pub default_symbols: Vec<String>,
    pub default_range: RangePreset,
    pub moving_average_window: usize,
    /// Characters of business summary shown before the ellipsis.
    pub summary_char_budget: usize,
    pub overview_rows: usize,
    pub currency_symbol: String,
    pub export_file: PathBuf,
    pub indices: Vec<IndexEntry>,
    pub index_failure_notice: String,
    pub provider: ProviderConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            catalog: [
                "AAPL",
                "MSFT",
                "GOOGL",
                "AMZN",
                "TSLA",
                "META",
                "NVDA",
                "NFLX",
                "IBM",
                "INTC",
                "TCS.NS",
                "RELIANCE.NS",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_symbols: vec!["AAPL".into()],
            default_range: RangePreset::SixMonths,
            moving_average_window: DEFAULT_MA_WINDOW,
            summary_char_budget: 200,
            overview_rows: 5,
            currency_symbol: "₹".into(),
            export_file: PathBuf::from("stock_data.csv"),
            indices: vec![
                IndexEntry::new("NIFTY 50", "^NSEI"),
                IndexEntry::new("SENSEX", "^BSESN"),
            ],
            index_failure_notice: "Failed to fetch NIFTY/SENSEX data".into(),
            provider: ProviderConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/stockx/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("stockx").join(CONFIG_FILE))
    }

    /// Explicit path if given, else the default path if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.moving_average_window == 0 {
            return Err(ConfigError::Invalid(
                "moving_average_window must be at least 1".into(),
            ));
        }
        if self.summary_char_budget == 0 {
            return Err(ConfigError::Invalid(
                "summary_char_budget must be at least 1".into(),
            ));
        }
        if self.catalog.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid("catalog must not be empty".into()));
        }
        if let Some(missing) = self
            .default_symbols
            .iter()
            .find(|s| !self.catalog.contains(s))
        {
            return Err(ConfigError::Invalid(format!(
                "default symbol '{missing}' is not in the catalog"
            )));
        }
        if self.indices.len() != 2 {
            return Err(ConfigError::Invalid(format!(
                "expected exactly two indices, found {}",
                self.indices.len()
            )));
        }
        Ok(())
    }
}
