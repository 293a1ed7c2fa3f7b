//! Raw provider table shapes.
//!
//! A single-symbol fetch yields flat metric labels (`Close`); a multi-symbol
//! fetch yields compound `(Metric, Symbol)` labels. The normalizer absorbs
//! the difference.

use super::align::AlignedData;
use super::provider::{RawBar, SymbolHistory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Price/volume fields of one trading-period record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl Metric {
    /// Canonical column order.
    pub const ALL: [Metric; 5] = [
        Metric::Open,
        Metric::High,
        Metric::Low,
        Metric::Close,
        Metric::Volume,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Open => "Open",
            Metric::High => "High",
            Metric::Low => "Low",
            Metric::Close => "Close",
            Metric::Volume => "Volume",
        }
    }

    /// `<Metric>_<Symbol>` canonical column name.
    pub fn column_name(self, symbol: &str) -> String {
        format!("{}_{}", self.label(), symbol)
    }

    pub fn value(self, bar: &RawBar) -> Option<f64> {
        let v = match self {
            Metric::Open => bar.open,
            Metric::High => bar.high,
            Metric::Low => bar.low,
            Metric::Close => bar.close,
            Metric::Volume => bar.volume.map(|v| v as f64),
        };
        v.filter(|x| !x.is_nan())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single-symbol table: columns labelled by metric only.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTable {
    /// The requested symbol. Not part of any column label.
    pub symbol: String,
    pub index: Vec<NaiveDate>,
    pub columns: Vec<(Metric, Vec<Option<f64>>)>,
}

impl FlatTable {
    pub fn from_history(history: SymbolHistory) -> Self {
        let mut bars = history.bars;
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);

        let index = bars.iter().map(|b| b.date).collect();
        let columns = Metric::ALL
            .iter()
            .map(|m| (*m, bars.iter().map(|b| m.value(b)).collect()))
            .collect();

        Self {
            symbol: history.symbol,
            index,
            columns,
        }
    }
}

/// Multi-symbol table: columns labelled by `(Metric, Symbol)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundTable {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<((Metric, String), Vec<Option<f64>>)>,
    /// Requested symbols the provider returned nothing for.
    pub dropped: Vec<String>,
}

impl CompoundTable {
    /// Build metric-major, symbol-minor columns from aligned bars.
    pub fn from_aligned(aligned: AlignedData, dropped: Vec<String>) -> Self {
        let mut columns = Vec::with_capacity(Metric::ALL.len() * aligned.symbols.len());
        for metric in Metric::ALL {
            for symbol in &aligned.symbols {
                if let Some(bars) = aligned.bars.get(symbol) {
                    let values = bars.iter().map(|b| metric.value(b)).collect();
                    columns.push(((metric, symbol.clone()), values));
                }
            }
        }

        Self {
            index: aligned.dates,
            columns,
            dropped,
        }
    }
}

/// The provider's response shape for a history request.
#[derive(Debug, Clone, PartialEq)]
pub enum RawSeriesTable {
    Flat(FlatTable),
    Compound(CompoundTable),
}

impl RawSeriesTable {
    /// No symbol returned any data.
    pub fn empty() -> Self {
        RawSeriesTable::Compound(CompoundTable::default())
    }

    /// Same as `empty`, remembering which symbols were requested.
    pub fn empty_with_dropped(dropped: Vec<String>) -> Self {
        RawSeriesTable::Compound(CompoundTable {
            dropped,
            ..CompoundTable::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawSeriesTable::Flat(t) => t.index.is_empty(),
            RawSeriesTable::Compound(t) => t.index.is_empty() || t.columns.is_empty(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            RawSeriesTable::Flat(t) => t.index.len(),
            RawSeriesTable::Compound(t) => t.index.len(),
        }
    }

    pub fn dropped(&self) -> &[String] {
        match self {
            RawSeriesTable::Flat(_) => &[],
            RawSeriesTable::Compound(t) => &t.dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::DataSource;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn flat_table_sorts_and_dedupes_dates() {
        let history = SymbolHistory {
            symbol: "AAPL".into(),
            bars: vec![
                RawBar::complete(d(3), 1.0, 2.0, 0.5, 1.5, 10),
                RawBar::complete(d(2), 1.0, 2.0, 0.5, 1.2, 10),
                RawBar::complete(d(3), 9.0, 9.0, 9.0, 9.0, 99),
            ],
            source: DataSource::Fixture,
        };
        let flat = FlatTable::from_history(history);
        assert_eq!(flat.index, vec![d(2), d(3)]);
        let close = &flat.columns.iter().find(|(m, _)| *m == Metric::Close).unwrap().1;
        assert_eq!(close, &vec![Some(1.2), Some(1.5)]);
    }

    #[test]
    fn nan_values_become_undefined() {
        let bar = RawBar {
            close: Some(f64::NAN),
            ..RawBar::void(d(2))
        };
        assert_eq!(Metric::Close.value(&bar), None);
    }

    #[test]
    fn empty_table_reports_dropped() {
        let raw = RawSeriesTable::empty_with_dropped(vec!["BAD".into()]);
        assert!(raw.is_empty());
        assert_eq!(raw.dropped(), &["BAD".to_string()]);
    }
}
