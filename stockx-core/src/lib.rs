//! STOCK.X core: domain types, quote client, series normalizer, indicators.
//!
//! This crate holds everything a single dashboard render pass computes on:
//! - Domain types (time ranges, symbol sets, quotes, fundamentals)
//! - The `QuoteClient` trait with Yahoo Finance, synthetic, and fixture clients
//! - Multi-symbol alignment and the flat/compound raw table shapes
//! - The series normalizer producing `<Metric>_<Symbol>` canonical tables
//! - The indicator engine (trailing moving average per symbol)

pub mod data;
pub mod domain;
pub mod indicators;

pub use data::{
    fetch_history, normalize, CanonicalTable, DataError, QuoteClient, RawSeriesTable,
};
pub use domain::{Fundamentals, Quote, RangePreset, SymbolSet, TimeRange};
pub use indicators::{add_moving_average, IndicatorTable, DEFAULT_MA_WINDOW};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a render pass hands across threads is
    /// Send + Sync (rayon fan-out of watchlist and fundamentals fetches).
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::TimeRange>();
        require_sync::<domain::TimeRange>();
        require_send::<domain::SymbolSet>();
        require_sync::<domain::SymbolSet>();
        require_send::<domain::Quote>();
        require_sync::<domain::Quote>();
        require_send::<domain::Fundamentals>();
        require_sync::<domain::Fundamentals>();

        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<data::CanonicalTable>();
        require_sync::<data::CanonicalTable>();
        require_send::<indicators::IndicatorTable>();
        require_sync::<indicators::IndicatorTable>();

        require_send::<data::YahooProvider>();
        require_sync::<data::YahooProvider>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();
        require_send::<data::FixtureProvider>();
        require_sync::<data::FixtureProvider>();
    }

    /// The client trait is object safe: render passes take `&dyn QuoteClient`.
    #[test]
    fn quote_client_is_object_safe() {
        fn _takes_dyn(client: &dyn QuoteClient, symbol: &str) -> Result<Quote, DataError> {
            client.fetch_latest_quote(symbol)
        }
    }
}
