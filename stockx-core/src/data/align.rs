//! Multi-symbol time alignment.
//!
//! Given bars for multiple symbols, align them to a common timeline.
//! Missing bars become void bars (no forward-fill of price data).

use super::provider::{RawBar, SymbolHistory};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Aligned bar data for multiple symbols on a common timeline.
#[derive(Debug, Clone, Default)]
pub struct AlignedData {
    /// The common date axis (sorted ascending, union of all symbols' dates).
    pub dates: Vec<NaiveDate>,
    /// Bars per symbol. Each inner Vec has the same length as `dates`.
    pub bars: HashMap<String, Vec<RawBar>>,
    /// Symbols included, in input order.
    pub symbols: Vec<String>,
}

/// Align multiple symbol histories to a common timeline.
///
/// For each date in the union of all symbols' dates, each symbol either has
/// its real bar or a void bar. Duplicate dates within one history keep the
/// first bar. A repeated symbol keeps its first history.
pub fn align_symbols(histories: Vec<SymbolHistory>) -> AlignedData {
    let mut all_dates = BTreeSet::new();
    for history in &histories {
        for bar in &history.bars {
            all_dates.insert(bar.date);
        }
    }
    let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

    let mut symbols = Vec::with_capacity(histories.len());
    let mut aligned: HashMap<String, Vec<RawBar>> = HashMap::new();

    for history in histories {
        if aligned.contains_key(&history.symbol) {
            continue;
        }

        let mut date_map: HashMap<NaiveDate, RawBar> = HashMap::new();
        for bar in history.bars {
            date_map.entry(bar.date).or_insert(bar);
        }

        let aligned_bars: Vec<RawBar> = dates
            .iter()
            .map(|date| date_map.remove(date).unwrap_or_else(|| RawBar::void(*date)))
            .collect();

        symbols.push(history.symbol.clone());
        aligned.insert(history.symbol, aligned_bars);
    }

    AlignedData {
        dates,
        bars: aligned,
        symbols,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::DataSource;

    fn bar(date: &str, close: f64) -> RawBar {
        RawBar::complete(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            close - 1.0,
            close + 1.0,
            close - 2.0,
            close,
            1000,
        )
    }

    fn history(symbol: &str, bars: Vec<RawBar>) -> SymbolHistory {
        SymbolHistory {
            symbol: symbol.into(),
            bars,
            source: DataSource::Fixture,
        }
    }

    #[test]
    fn align_fills_missing_with_void() {
        let aligned = align_symbols(vec![
            history(
                "SPY",
                vec![
                    bar("2024-01-02", 100.0),
                    bar("2024-01-03", 101.0),
                    bar("2024-01-04", 102.0),
                ],
            ),
            history(
                "QQQ",
                // QQQ missing 2024-01-03
                vec![bar("2024-01-02", 200.0), bar("2024-01-04", 202.0)],
            ),
        ]);

        assert_eq!(aligned.dates.len(), 3);
        assert_eq!(aligned.symbols, vec!["SPY".to_string(), "QQQ".to_string()]);
        assert_eq!(aligned.bars["SPY"][1].close, Some(101.0));
        assert!(aligned.bars["QQQ"][1].is_void());
    }

    #[test]
    fn ragged_starts_share_union_axis() {
        let aligned = align_symbols(vec![
            history("OLD", vec![bar("2024-01-02", 1.0), bar("2024-01-03", 2.0)]),
            history("NEW", vec![bar("2024-01-03", 5.0)]),
        ]);
        assert_eq!(aligned.dates.len(), 2);
        assert!(aligned.bars["NEW"][0].is_void());
        assert_eq!(aligned.bars["NEW"][1].close, Some(5.0));
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let aligned = align_symbols(vec![history(
            "SPY",
            vec![bar("2024-01-04", 3.0), bar("2024-01-02", 1.0)],
        )]);
        assert!(aligned.dates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(aligned.bars["SPY"][0].close, Some(1.0));
    }
}
