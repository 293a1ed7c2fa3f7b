//! Deterministic synthetic quote client for offline demos.
//!
//! Each symbol gets a random walk seeded by the BLAKE3 hash of its name. The
//! walk always starts at the same epoch, so a given date has the same bar no
//! matter which range is requested.

use super::provider::{latest_quote, DataError, DataSource, QuoteClient, RawBar, SymbolHistory};
use crate::domain::{Fundamentals, Quote, TimeRange};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// First date of every synthetic walk.
const EPOCH: (i32, u32, u32) = (2000, 1, 3);

pub struct SyntheticProvider {
    as_of: NaiveDate,
    unknown: HashSet<String>,
}

impl SyntheticProvider {
    /// A client whose "today" is `as_of`. No bar is produced after it.
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            unknown: HashSet::new(),
        }
    }

    /// Treat `symbol` as an invalid ticker.
    pub fn with_unknown(mut self, symbol: &str) -> Self {
        self.unknown.insert(symbol.to_string());
        self
    }

    fn check(&self, symbol: &str) -> Result<(), DataError> {
        if symbol.trim().is_empty() || self.unknown.contains(symbol) {
            return Err(DataError::not_found(symbol));
        }
        Ok(())
    }

    fn rng(symbol: &str, salt: &[u8]) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(salt);
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Walk from the epoch through `end`, keeping bars on or after `start`.
    fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<RawBar> {
        let mut rng = Self::rng(symbol, b"bars");
        let mut bars = Vec::new();
        let Some(mut current) = NaiveDate::from_ymd_opt(EPOCH.0, EPOCH.1, EPOCH.2) else {
            return bars;
        };
        let end = end.min(self.as_of);
        let mut price: f64 = rng.gen_range(20.0..500.0);

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = (price * (1.0 + daily_return)).max(1.0);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume: u64 = rng.gen_range(100_000..10_000_000);

            if current >= start {
                bars.push(RawBar::complete(current, open, high, low, close, volume));
            }

            price = close;
            current += chrono::Duration::days(1);
        }

        bars
    }
}

impl QuoteClient for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_symbol_history(
        &self,
        symbol: &str,
        range: &TimeRange,
    ) -> Result<SymbolHistory, DataError> {
        self.check(symbol)?;
        Ok(SymbolHistory {
            symbol: symbol.to_string(),
            bars: self.generate(symbol, range.start(), range.end()),
            source: DataSource::Synthetic,
        })
    }

    fn fetch_latest_quote(&self, symbol: &str) -> Result<Quote, DataError> {
        self.check(symbol)?;
        let start = self.as_of - chrono::Duration::days(7);
        let bars = self.generate(symbol, start, self.as_of);
        latest_quote(symbol, &bars, None)
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, DataError> {
        self.check(symbol)?;
        let mut rng = Self::rng(symbol, b"fundamentals");
        let high: f64 = rng.gen_range(50.0..600.0);
        Ok(Fundamentals {
            short_name: Some(format!("{symbol} Synthetic Corp.")),
            long_business_summary: Some(format!(
                "{symbol} Synthetic Corp. is a generated company used for offline \
                 dashboards. Its prices follow a seeded random walk and carry no \
                 relation to any listed security. The figures below are produced \
                 from the same seed and are stable across runs."
            )),
            sector: Some("Synthetic".into()),
            market_cap: Some(rng.gen_range(1_000_000_000..3_000_000_000_000)),
            trailing_pe: Some(rng.gen_range(5.0..60.0)),
            trailing_eps: Some(rng.gen_range(-2.0..20.0)),
            dividend_yield: if rng.gen_bool(0.5) {
                Some(rng.gen_range(0.001..0.05))
            } else {
                None
            },
            fifty_two_week_high: Some(high),
            fifty_two_week_low: Some(high * rng.gen_range(0.4..0.9)),
            beta: Some(rng.gen_range(0.3..2.0)),
        })
    }
}
