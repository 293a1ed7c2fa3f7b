//! Appends per-symbol moving averages to a canonical table.

use super::sma::Sma;
use super::ColumnIndicator;
use crate::data::{CanonicalTable, Metric, SeriesColumn};
use crate::domain::SymbolSet;
use tracing::debug;

pub const DEFAULT_MA_WINDOW: usize = 20;

/// A canonical table plus its `MA<window>_<Symbol>` columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    table: CanonicalTable,
    window: usize,
}

impl IndicatorTable {
    /// An empty table with no indicator columns.
    pub fn empty(window: usize) -> Self {
        Self {
            table: CanonicalTable::empty(),
            window: window.max(1),
        }
    }

    pub fn canonical(&self) -> &CanonicalTable {
        &self.table
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn ma_column(&self, symbol: &str) -> String {
        Sma::new(self.window).output_column(symbol)
    }

    pub fn moving_average(&self, symbol: &str) -> Option<&[Option<f64>]> {
        self.table.column(&self.ma_column(symbol))
    }
}

/// Add a trailing `window`-observation mean of `Close_<Symbol>` for every
/// symbol in `symbols` whose close column exists. Others are skipped.
pub fn add_moving_average(
    table: &CanonicalTable,
    symbols: &SymbolSet,
    window: usize,
) -> IndicatorTable {
    let sma = Sma::new(window);
    let mut out = table.clone();

    for symbol in symbols.iter() {
        let Some(close) = table.column(&Metric::Close.column_name(symbol)) else {
            debug!(symbol, "no close column, skipping moving average");
            continue;
        };
        let observed = close.iter().flatten().count();
        let values = if observed > sma.lookback() {
            sma.compute(close)
        } else {
            debug!(
                symbol,
                observed,
                window = sma.period(),
                "too few closes, moving average undefined"
            );
            vec![None; close.len()]
        };
        let column = SeriesColumn {
            name: sma.output_column(symbol),
            values,
        };
        if let Err(e) = out.push_column(column) {
            debug!(symbol, error = %e, "moving average column rejected");
        }
    }

    IndicatorTable {
        table: out,
        window: sma.period(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(columns: Vec<(&str, Vec<Option<f64>>)>) -> CanonicalTable {
        let height = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..height)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        CanonicalTable::from_columns(
            dates,
            columns
                .into_iter()
                .map(|(name, values)| SeriesColumn {
                    name: name.into(),
                    values,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn adds_ma_column_and_keeps_sources() {
        let t = table(vec![("Close_AAPL", vec![Some(1.0), Some(2.0), Some(3.0)])]);
        let out = add_moving_average(&t, &SymbolSet::new(["AAPL"]), 2);
        assert_eq!(out.canonical().column("Close_AAPL"), t.column("Close_AAPL"));
        assert_eq!(out.moving_average("AAPL").unwrap(), &[None, Some(1.5), Some(2.5)]);
        assert_eq!(out.ma_column("AAPL"), "MA2_AAPL");
    }

    #[test]
    fn missing_symbol_is_skipped() {
        let t = table(vec![("Close_AAPL", vec![Some(1.0)])]);
        let out = add_moving_average(&t, &SymbolSet::new(["AAPL", "BAD"]), DEFAULT_MA_WINDOW);
        assert!(out.moving_average("BAD").is_none());
        assert!(out.canonical().has_column("MA20_AAPL"));
    }

    #[test]
    fn per_symbol_warmup_on_ragged_table() {
        let mut late = vec![None; 3];
        late.extend([Some(10.0), Some(20.0)]);
        let t = table(vec![
            ("Close_OLD", vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]),
            ("Close_NEW", late),
        ]);
        let out = add_moving_average(&t, &SymbolSet::new(["OLD", "NEW"]), 2);
        assert_eq!(out.moving_average("OLD").unwrap()[1], Some(1.5));
        assert_eq!(
            out.moving_average("NEW").unwrap(),
            &[None, None, None, None, Some(15.0)]
        );
    }

    #[test]
    fn too_few_closes_give_an_undefined_average() {
        let t = table(vec![("Close_AAPL", vec![Some(1.0), None, Some(3.0)])]);
        let out = add_moving_average(&t, &SymbolSet::new(["AAPL"]), 3);
        assert_eq!(out.moving_average("AAPL").unwrap(), &[None, None, None]);
    }

    #[test]
    fn repeated_application_is_stable() {
        let t = table(vec![("Close_AAPL", vec![Some(1.0), Some(2.0)])]);
        let symbols = SymbolSet::new(["AAPL"]);
        let once = add_moving_average(&t, &symbols, 2);
        let twice = add_moving_average(once.canonical(), &symbols, 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_table_stays_empty() {
        let out = add_moving_average(&CanonicalTable::empty(), &SymbolSet::new(["AAPL"]), 20);
        assert!(out.canonical().is_empty());
        assert_eq!(out.canonical().column_names(), vec!["Date"]);
    }
}
