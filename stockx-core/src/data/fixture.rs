//! In-memory quote client with per-symbol failure injection.
//!
//! Used by tests across the workspace so render passes run without network.

use super::provider::{latest_quote, DataError, DataSource, QuoteClient, RawBar, SymbolHistory};
use crate::domain::{Fundamentals, Quote, TimeRange};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FixtureProvider {
    histories: HashMap<String, Vec<RawBar>>,
    quotes: HashMap<String, Quote>,
    fundamentals: HashMap<String, Fundamentals>,
    failures: HashMap<String, DataError>,
    calls: Mutex<Vec<String>>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, symbol: &str, bars: Vec<RawBar>) -> Self {
        self.histories.insert(symbol.to_string(), bars);
        self
    }

    /// Override the quote computed from history.
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quotes.insert(quote.symbol.clone(), quote);
        self
    }

    pub fn with_fundamentals(mut self, symbol: &str, fundamentals: Fundamentals) -> Self {
        self.fundamentals.insert(symbol.to_string(), fundamentals);
        self
    }

    /// Every call for `symbol` fails with `error`.
    pub fn with_failure(mut self, symbol: &str, error: DataError) -> Self {
        self.failures.insert(symbol.to_string(), error);
        self
    }

    /// Calls made so far, as `<method>:<symbol>`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, method: &str, symbol: &str) -> Result<(), DataError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(format!("{method}:{symbol}"));
        }
        match self.failures.get(symbol) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl QuoteClient for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch_symbol_history(
        &self,
        symbol: &str,
        _range: &TimeRange,
    ) -> Result<SymbolHistory, DataError> {
        self.record("history", symbol)?;
        let bars = self
            .histories
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::not_found(symbol))?;
        Ok(SymbolHistory {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Fixture,
        })
    }

    fn fetch_latest_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        self.record("quote", symbol)?;
        if let Some(quote) = self.quotes.get(symbol) {
            return Ok(quote.clone());
        }
        match self.histories.get(symbol) {
            Some(bars) => latest_quote(symbol, bars, None),
            None => Err(DataError::not_found(symbol)),
        }
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError> {
        self.record("fundamentals", symbol)?;
        self.fundamentals
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::not_found(symbol))
    }
}

/// Consecutive-day bars with the given closes, starting at `start`.
///
/// open = previous close (or close for the first bar), high/low = ±1 around
/// the body, volume = 1000 + 10·i.
pub fn bars(start: NaiveDate, closes: &[f64]) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            RawBar::complete(
                start + chrono::Duration::days(i as i64),
                open,
                open.max(close) + 1.0,
                open.min(close) - 1.0,
                close,
                1000 + 10 * i as u64,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn quote_derives_from_history() {
        let client = FixtureProvider::new().with_history("AAPL", bars(d(2), &[100.0, 101.0]));
        let quote = client.fetch_latest_quote("AAPL").unwrap();
        assert_eq!(quote.price, 101.0);
        assert!((quote.pct_change - 1.0).abs() < 1e-9);
    }

    #[test]
    fn failure_overrides_data_and_is_logged() {
        let client = FixtureProvider::new()
            .with_history("AAPL", bars(d(2), &[1.0]))
            .with_failure(
                "AAPL",
                DataError::RateLimited {
                    symbol: "AAPL".into(),
                    retry_after_secs: 5,
                },
            );
        assert_eq!(client.fetch_latest_quote("AAPL").unwrap_err().category(), "rate_limited");
        assert_eq!(client.calls(), vec!["quote:AAPL".to_string()]);
    }

    #[test]
    fn missing_fundamentals_is_not_found() {
        let client = FixtureProvider::new();
        assert!(client.fetch_fundamentals("AAPL").is_err());
    }
}
