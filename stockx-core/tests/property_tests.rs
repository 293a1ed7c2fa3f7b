//! Property tests for the normalizer and indicator engine.
//!
//! Uses proptest to verify:
//! 1. Flat vs compound input is transparent to the canonical output
//! 2. Symbols absent from a fetch contribute no columns
//! 3. `add_moving_average` is pure
//! 4. Short series have an all-undefined moving average

use chrono::NaiveDate;
use proptest::prelude::*;
use stockx_core::data::{
    align_symbols, normalize, CompoundTable, DataSource, FlatTable, RawBar, RawSeriesTable,
    SymbolHistory,
};
use stockx_core::{add_moving_average, SymbolSet};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_close() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![
        1 => Just(None),
        4 => (1.0..500.0_f64).prop_map(|p| Some((p * 100.0).round() / 100.0)),
    ]
}

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(arb_close(), 1..max_len)
}

fn history(symbol: &str, closes: &[Option<f64>]) -> SymbolHistory {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            let date = start + chrono::Duration::days(i as i64);
            match close {
                Some(c) => RawBar::complete(date, *c, c + 1.0, c - 1.0, *c, 1000 + i as u64),
                None => RawBar::void(date),
            }
        })
        .collect();
    SymbolHistory {
        symbol: symbol.into(),
        bars,
        source: DataSource::Fixture,
    }
}

fn defined_count(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_some()).count()
}

// ── 1. Flat vs compound ──────────────────────────────────────────────

proptest! {
    #[test]
    fn flat_and_compound_normalize_identically(closes in arb_closes(60)) {
        let symbols = SymbolSet::new(["AAPL"]);
        let flat = RawSeriesTable::Flat(FlatTable::from_history(history("AAPL", &closes)));
        let compound = RawSeriesTable::Compound(CompoundTable::from_aligned(
            align_symbols(vec![history("AAPL", &closes)]),
            vec![],
        ));

        let a = normalize(&flat, &symbols);
        let b = normalize(&compound, &symbols);
        prop_assert_eq!(a.column_names(), b.column_names());
        prop_assert_eq!(a, b);
    }

    /// Every row of the canonical table has at least one defined value.
    #[test]
    fn all_undefined_rows_are_pruned(closes in arb_closes(60)) {
        let raw = RawSeriesTable::Flat(FlatTable::from_history(history("AAPL", &closes)));
        let table = normalize(&raw, &SymbolSet::new(["AAPL"]));
        prop_assert_eq!(table.height(), defined_count(&closes));
    }
}

// ── 2. Absent symbols ────────────────────────────────────────────────

proptest! {
    #[test]
    fn absent_symbols_contribute_no_columns(
        a in arb_closes(40),
        b in arb_closes(40),
    ) {
        let symbols = SymbolSet::new(["AAPL", "BADTICKER", "MSFT"]);
        let raw = RawSeriesTable::Compound(CompoundTable::from_aligned(
            align_symbols(vec![history("AAPL", &a), history("MSFT", &b)]),
            vec!["BADTICKER".into()],
        ));
        let table = normalize(&raw, &symbols);
        prop_assert!(table.column_names().iter().all(|c| !c.ends_with("_BADTICKER")));

        let out = add_moving_average(&table, &symbols, 20);
        prop_assert!(out.moving_average("BADTICKER").is_none());
    }
}

// ── 3. Purity ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn moving_average_is_pure(
        a in arb_closes(80),
        b in arb_closes(80),
        window in 1usize..30,
    ) {
        let symbols = SymbolSet::new(["AAPL", "MSFT"]);
        let raw = RawSeriesTable::Compound(CompoundTable::from_aligned(
            align_symbols(vec![history("AAPL", &a), history("MSFT", &b)]),
            vec![],
        ));
        let table = normalize(&raw, &symbols);
        let before = table.clone();

        let first = add_moving_average(&table, &symbols, window);
        let second = add_moving_average(&table, &symbols, window);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(table, before);
    }
}

// ── 4. Short series ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn short_series_ma_is_all_undefined(closes in arb_closes(60)) {
        prop_assume!(defined_count(&closes) < 20);
        let symbols = SymbolSet::new(["IPO"]);
        let raw = RawSeriesTable::Flat(FlatTable::from_history(history("IPO", &closes)));
        let table = normalize(&raw, &symbols);
        let out = add_moving_average(&table, &symbols, 20);

        if let Some(ma) = out.moving_average("IPO") {
            prop_assert!(ma.iter().all(Option::is_none));
        }
    }

    /// The MA is defined exactly on rows with a close once 20 closes have been seen.
    #[test]
    fn ma_defined_after_window_observations(closes in arb_closes(80)) {
        let symbols = SymbolSet::new(["AAPL"]);
        let raw = RawSeriesTable::Flat(FlatTable::from_history(history("AAPL", &closes)));
        let table = normalize(&raw, &symbols);
        let out = add_moving_average(&table, &symbols, 20);

        if let (Some(close), Some(ma)) = (table.column("Close_AAPL"), out.moving_average("AAPL")) {
            let mut seen = 0;
            for (c, m) in close.iter().zip(ma) {
                if c.is_some() {
                    seen += 1;
                }
                prop_assert_eq!(m.is_some(), c.is_some() && seen >= 20);
            }
        }
    }
}
