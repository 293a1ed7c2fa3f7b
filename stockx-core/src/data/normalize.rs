//! Series normalizer.
//!
//! Turns either raw table shape into one canonical table: an explicit `Date`
//! column plus `<Metric>_<Symbol>` columns, regardless of how many symbols
//! were requested.

use super::raw::{Metric, RawSeriesTable};
use crate::domain::SymbolSet;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Name of the explicit date column.
pub const DATE_COLUMN: &str = "Date";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("column '{name}' has {len} values but the date axis has {height}")]
    LengthMismatch {
        name: String,
        len: usize,
        height: usize,
    },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("column name '{0}' is reserved")]
    ReservedName(String),

    #[error("dates must be strictly ascending")]
    UnsortedDates,
}

/// One named value column. `None` marks an undefined value.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Date-indexed table with uniformly named columns.
///
/// Invariants: dates strictly ascending, every column as long as the date
/// axis, column names unique and never `Date`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalTable {
    dates: Vec<NaiveDate>,
    columns: Vec<SeriesColumn>,
}

impl CanonicalTable {
    /// Zero rows, only the `Date` column.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_columns(
        dates: Vec<NaiveDate>,
        columns: Vec<SeriesColumn>,
    ) -> Result<Self, TableError> {
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TableError::UnsortedDates);
        }
        let mut table = Self {
            dates,
            columns: Vec::with_capacity(columns.len()),
        };
        let mut seen = HashSet::new();
        for column in columns {
            if !seen.insert(column.name.clone()) {
                return Err(TableError::DuplicateColumn(column.name));
            }
            table.check_column(&column)?;
            table.columns.push(column);
        }
        Ok(table)
    }

    fn check_column(&self, column: &SeriesColumn) -> Result<(), TableError> {
        if column.name == DATE_COLUMN {
            return Err(TableError::ReservedName(column.name.clone()));
        }
        if column.values.len() != self.dates.len() {
            return Err(TableError::LengthMismatch {
                name: column.name.clone(),
                len: column.values.len(),
                height: self.dates.len(),
            });
        }
        Ok(())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[SeriesColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn has_column(&self, name: &str) -> bool {
        name == DATE_COLUMN || self.columns.iter().any(|c| c.name == name)
    }

    /// All column names, `Date` first.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(DATE_COLUMN)
            .chain(self.columns.iter().map(|c| c.name.as_str()))
            .collect()
    }

    pub fn height(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Append a column, replacing any existing column of the same name in place.
    pub(crate) fn push_column(&mut self, column: SeriesColumn) -> Result<(), TableError> {
        self.check_column(&column)?;
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }
}

/// Flatten a raw provider table into canonical form.
///
/// Symbols whose columns are entirely undefined contribute nothing. Rows on
/// which every remaining column is undefined are dropped. An empty raw table
/// yields `CanonicalTable::empty()`.
pub fn normalize(raw: &RawSeriesTable, symbols: &SymbolSet) -> CanonicalTable {
    // (metric, symbol) -> values, plus the symbols in raw order.
    let mut cells: HashMap<(Metric, &str), &[Option<f64>]> = HashMap::new();
    let mut raw_symbols: Vec<&str> = Vec::new();
    let index = match raw {
        RawSeriesTable::Flat(flat) => {
            raw_symbols.push(flat.symbol.as_str());
            for (metric, values) in &flat.columns {
                cells.insert((*metric, flat.symbol.as_str()), values);
            }
            &flat.index
        }
        RawSeriesTable::Compound(table) => {
            for ((metric, symbol), values) in &table.columns {
                if !raw_symbols.contains(&symbol.as_str()) {
                    raw_symbols.push(symbol);
                }
                cells.insert((*metric, symbol.as_str()), values);
            }
            &table.index
        }
    };

    if index.is_empty() {
        return CanonicalTable::empty();
    }

    let has_data = |symbol: &str| {
        Metric::ALL.iter().any(|m| {
            cells
                .get(&(*m, symbol))
                .is_some_and(|values| values.iter().any(Option::is_some))
        })
    };

    // Requested symbols first, in set order, then anything else the provider sent.
    let mut ordered: Vec<&str> = symbols
        .iter()
        .filter(|s| raw_symbols.contains(s))
        .collect();
    ordered.extend(raw_symbols.iter().filter(|s| !symbols.contains(s)));
    ordered.retain(|s| has_data(s));

    let mut columns = Vec::new();
    for metric in Metric::ALL {
        for symbol in &ordered {
            if let Some(values) = cells.get(&(metric, *symbol)) {
                columns.push((metric.column_name(symbol), *values));
            }
        }
    }

    let keep: Vec<usize> = (0..index.len())
        .filter(|&row| {
            columns
                .iter()
                .any(|(_, values)| values.get(row).copied().flatten().is_some())
        })
        .collect();

    let dates = keep.iter().map(|&row| index[row]).collect();
    let columns = columns
        .into_iter()
        .map(|(name, values)| SeriesColumn {
            name,
            values: keep
                .iter()
                .map(|&row| values.get(row).copied().flatten())
                .collect(),
        })
        .collect();

    CanonicalTable { dates, columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align::align_symbols;
    use crate::data::provider::{DataSource, RawBar, SymbolHistory};
    use crate::data::raw::{CompoundTable, FlatTable};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn history(symbol: &str, start: u32, closes: &[f64]) -> SymbolHistory {
        SymbolHistory {
            symbol: symbol.into(),
            bars: closes
                .iter()
                .enumerate()
                .map(|(i, &c)| RawBar::complete(d(start + i as u32), c, c + 1.0, c - 1.0, c, 100))
                .collect(),
            source: DataSource::Fixture,
        }
    }

    fn compound(histories: Vec<SymbolHistory>) -> RawSeriesTable {
        RawSeriesTable::Compound(CompoundTable::from_aligned(align_symbols(histories), vec![]))
    }

    #[test]
    fn flat_input_gets_symbol_suffix() {
        let raw = RawSeriesTable::Flat(FlatTable::from_history(history("AAPL", 2, &[1.0, 2.0])));
        let table = normalize(&raw, &SymbolSet::new(["AAPL"]));
        assert_eq!(
            table.column_names(),
            vec!["Date", "Open_AAPL", "High_AAPL", "Low_AAPL", "Close_AAPL", "Volume_AAPL"]
        );
        assert_eq!(table.column("Close_AAPL").unwrap(), &[Some(1.0), Some(2.0)]);
    }

    #[test]
    fn compound_columns_are_metric_major_in_set_order() {
        let raw = compound(vec![history("MSFT", 2, &[5.0]), history("AAPL", 2, &[1.0])]);
        let table = normalize(&raw, &SymbolSet::new(["AAPL", "MSFT"]));
        let names = table.column_names();
        assert_eq!(&names[..5], &["Date", "Open_AAPL", "Open_MSFT", "High_AAPL", "High_MSFT"]);
    }

    #[test]
    fn ragged_histories_keep_gaps_undefined() {
        let raw = compound(vec![history("OLD", 2, &[1.0, 2.0, 3.0]), history("NEW", 4, &[9.0])]);
        let table = normalize(&raw, &SymbolSet::new(["OLD", "NEW"]));
        assert_eq!(table.height(), 3);
        assert_eq!(table.column("Close_NEW").unwrap(), &[None, None, Some(9.0)]);
    }

    #[test]
    fn dropped_symbol_has_no_columns() {
        let raw = compound(vec![history("AAPL", 2, &[1.0])]);
        let table = normalize(&raw, &SymbolSet::new(["AAPL", "BAD"]));
        assert!(!table.has_column("Close_BAD"));
        assert!(table.has_column("Close_AAPL"));
    }

    #[test]
    fn all_undefined_symbol_is_excluded() {
        let mut empty = history("GHOST", 2, &[1.0]);
        empty.bars = vec![RawBar::void(d(2))];
        let raw = compound(vec![history("AAPL", 2, &[1.0]), empty]);
        let table = normalize(&raw, &SymbolSet::new(["AAPL", "GHOST"]));
        assert!(!table.has_column("Close_GHOST"));
    }

    #[test]
    fn empty_raw_gives_date_only_table() {
        let table = normalize(&RawSeriesTable::empty(), &SymbolSet::new(["AAPL"]));
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec![DATE_COLUMN]);
    }

    #[test]
    fn from_columns_rejects_ragged_column() {
        let err = CanonicalTable::from_columns(
            vec![d(2), d(3)],
            vec![SeriesColumn {
                name: "Close_X".into(),
                values: vec![Some(1.0)],
            }],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { .. }));
    }

    #[test]
    fn push_column_replaces_same_name() {
        let mut table = CanonicalTable::from_columns(
            vec![d(2)],
            vec![SeriesColumn {
                name: "MA20_X".into(),
                values: vec![None],
            }],
        )
        .unwrap();
        table
            .push_column(SeriesColumn {
                name: "MA20_X".into(),
                values: vec![Some(1.0)],
            })
            .unwrap();
        assert_eq!(table.columns().len(), 1);
        assert_eq!(table.column("MA20_X").unwrap(), &[Some(1.0)]);
    }
}
