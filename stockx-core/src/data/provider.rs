//! Quote client trait and structured error types.
//!
//! The `QuoteClient` trait abstracts over market-data sources (Yahoo Finance,
//! synthetic data, in-memory fixtures) so a render pass can be driven by any
//! of them and tested without network access.

use crate::domain::{Fundamentals, Quote, TimeRange};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw daily OHLCV bar from a provider. Missing fields stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

impl RawBar {
    /// A bar with every field set, the common case for clean data.
    pub fn complete(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// A placeholder for a date on which the symbol did not trade.
    pub fn void(date: NaiveDate) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }

    pub fn is_void(&self) -> bool {
        self.open.is_none()
            && self.high.is_none()
            && self.low.is_none()
            && self.close.is_none()
            && self.volume.is_none()
    }
}

/// The typed "data unavailable" result of every client call.
///
/// Each variant means the provider returned nothing usable for the symbol;
/// the variants only distinguish why. Displayable in both CLI and TUI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("network unreachable while fetching {symbol}: {reason}")]
    NetworkUnreachable { symbol: String, reason: String },

    #[error("rate limited by provider while fetching {symbol} (retry after {retry_after_secs}s)")]
    RateLimited { symbol: String, retry_after_secs: u64 },

    #[error("authentication required while fetching {symbol}")]
    AuthenticationRequired { symbol: String },

    #[error("response format changed for {symbol}: {reason}")]
    ResponseFormatChanged { symbol: String, reason: String },

    #[error("no prior close available for {symbol}")]
    InsufficientHistory { symbol: String },
}

impl DataError {
    pub fn symbol(&self) -> &str {
        match self {
            DataError::SymbolNotFound { symbol }
            | DataError::NetworkUnreachable { symbol, .. }
            | DataError::RateLimited { symbol, .. }
            | DataError::AuthenticationRequired { symbol }
            | DataError::ResponseFormatChanged { symbol, .. }
            | DataError::InsufficientHistory { symbol } => symbol,
        }
    }

    /// Short category tag for logs and the error history.
    pub fn category(&self) -> &'static str {
        match self {
            DataError::SymbolNotFound { .. } => "not_found",
            DataError::NetworkUnreachable { .. } => "network",
            DataError::RateLimited { .. } => "rate_limited",
            DataError::AuthenticationRequired { .. } => "auth",
            DataError::ResponseFormatChanged { .. } => "format",
            DataError::InsufficientHistory { .. } => "history",
        }
    }

    pub fn not_found(symbol: &str) -> Self {
        DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        }
    }
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Synthetic,
    Fixture,
}

/// Result of a successful history fetch for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolHistory {
    pub symbol: String,
    pub bars: Vec<RawBar>,
    pub source: DataSource,
}

/// Market-data capability consumed by the dashboard.
///
/// Every call is a single blocking attempt: no retries, no caching. Failures
/// are returned as `DataError`, never papered over with placeholder values.
pub trait QuoteClient: Send + Sync {
    /// Human-readable name of this client.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV bars for one symbol over an inclusive date range.
    fn fetch_symbol_history(
        &self,
        symbol: &str,
        range: &TimeRange,
    ) -> Result<SymbolHistory, DataError>;

    /// Fetch the most recent close and its percent change from the prior close.
    fn fetch_latest_quote(&self, symbol: &str) -> Result<Quote, DataError>;

    /// Fetch the company-info record.
    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError>;
}

/// Derive a quote from the trailing daily bars of a symbol.
///
/// The prior close is the close of the previous defined bar, falling back to
/// the provider-reported previous close when only one bar is available.
pub fn latest_quote(
    symbol: &str,
    bars: &[RawBar],
    reported_previous_close: Option<f64>,
) -> Result<Quote, DataError> {
    let mut closes = bars.iter().rev().filter_map(|b| b.close.filter(|c| c.is_finite()));

    let close = closes.next().ok_or_else(|| DataError::not_found(symbol))?;
    let previous = closes
        .next()
        .or(reported_previous_close.filter(|c| c.is_finite()))
        .filter(|c| *c != 0.0)
        .ok_or_else(|| DataError::InsufficientHistory {
            symbol: symbol.to_string(),
        })?;

    Ok(Quote::from_closes(symbol, close, previous))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: Option<f64>) -> RawBar {
        RawBar {
            close,
            ..RawBar::void(NaiveDate::from_ymd_opt(2024, 1, day).unwrap())
        }
    }

    #[test]
    fn quote_uses_last_two_defined_closes() {
        let bars = vec![bar(2, Some(90.0)), bar(3, Some(100.0)), bar(4, None), bar(5, Some(110.0))];
        let q = latest_quote("AAPL", &bars, None).unwrap();
        assert_eq!(q.price, 110.0);
        assert!((q.pct_change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn quote_falls_back_to_reported_previous_close() {
        let bars = vec![bar(5, Some(102.0))];
        let q = latest_quote("AAPL", &bars, Some(100.0)).unwrap();
        assert!((q.pct_change - 2.0).abs() < 1e-9);
    }

    #[test]
    fn no_bars_is_not_found() {
        let err = latest_quote("NOPE", &[], Some(100.0)).unwrap_err();
        assert_eq!(err, DataError::not_found("NOPE"));
    }

    #[test]
    fn single_bar_without_reported_close_is_insufficient() {
        let err = latest_quote("IPO", &[bar(5, Some(10.0))], None).unwrap_err();
        assert!(matches!(err, DataError::InsufficientHistory { .. }));
        assert_eq!(err.symbol(), "IPO");
        assert_eq!(err.category(), "history");
    }

    #[test]
    fn void_bar_detection() {
        assert!(bar(2, None).is_void());
        assert!(!bar(2, Some(1.0)).is_void());
    }
}
