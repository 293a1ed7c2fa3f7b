//! End-to-end fetch → normalize → indicate runs against in-memory clients.

use chrono::NaiveDate;
use stockx_core::data::fixture::{bars, FixtureProvider};
use stockx_core::data::{DataError, SyntheticProvider};
use stockx_core::{
    add_moving_average, fetch_history, normalize, QuoteClient, RangePreset, SymbolSet, TimeRange,
};

fn d(m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, day).unwrap()
}

#[test]
fn single_and_multi_fetch_share_column_names() {
    let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let client = FixtureProvider::new()
        .with_history("AAPL", bars(d(1, 1), &closes))
        .with_history("MSFT", bars(d(1, 1), &closes));
    let range = TimeRange::new(d(1, 1), d(3, 1)).unwrap();

    let single_set = SymbolSet::new(["AAPL"]);
    let single = normalize(&fetch_history(&client, &single_set, &range).unwrap(), &single_set);

    let multi_set = SymbolSet::new(["AAPL", "MSFT"]);
    let multi = normalize(&fetch_history(&client, &multi_set, &range).unwrap(), &multi_set);

    assert_eq!(single.column("Close_AAPL"), multi.column("Close_AAPL"));
    assert!(single.has_column("Volume_AAPL"));
    assert!(multi.has_column("Volume_MSFT"));
}

#[test]
fn ma20_warmup_is_per_symbol() {
    let long: Vec<f64> = (0..40).map(|i| i as f64).collect();
    let short: Vec<f64> = (0..25).map(|i| 1000.0 + i as f64).collect();
    let client = FixtureProvider::new()
        .with_history("OLD", bars(d(1, 1), &long))
        .with_history("NEW", bars(d(1, 16), &short));
    let symbols = SymbolSet::new(["OLD", "NEW"]);
    let range = TimeRange::new(d(1, 1), d(3, 1)).unwrap();

    let table = normalize(&fetch_history(&client, &symbols, &range).unwrap(), &symbols);
    let out = add_moving_average(&table, &symbols, 20);

    let new_ma = out.moving_average("NEW").unwrap();
    let first_defined = new_ma.iter().position(Option::is_some).unwrap();
    // NEW starts on row 15 and needs 20 observations.
    assert_eq!(first_defined, 15 + 19);
    let old_ma = out.moving_average("OLD").unwrap();
    assert_eq!(old_ma.iter().position(Option::is_some), Some(19));
}

#[test]
fn all_symbols_failing_degrades_to_empty_table() {
    let client = FixtureProvider::new()
        .with_failure("A", DataError::not_found("A"))
        .with_failure(
            "B",
            DataError::NetworkUnreachable {
                symbol: "B".into(),
                reason: "offline".into(),
            },
        );
    let symbols = SymbolSet::new(["A", "B"]);
    let range = TimeRange::new(d(1, 1), d(2, 1)).unwrap();
    let raw = fetch_history(&client, &symbols, &range).unwrap();
    assert_eq!(raw.dropped(), &["A".to_string(), "B".to_string()]);

    let table = normalize(&raw, &symbols);
    assert!(table.is_empty());
    assert_eq!(table.column_names(), vec!["Date"]);
    assert!(add_moving_average(&table, &symbols, 20).canonical().is_empty());
}

#[test]
fn synthetic_client_runs_the_whole_pipeline() {
    let today = d(6, 28);
    let client = SyntheticProvider::new(today).with_unknown("BADTICKER");
    let range = TimeRange::from_preset(RangePreset::SixMonths, today);
    let symbols = SymbolSet::new(["AAPL", "BADTICKER", "TCS.NS"]);

    let raw = fetch_history(&client, &symbols, &range).unwrap();
    let table = normalize(&raw, &symbols);
    let out = add_moving_average(&table, &symbols, 20);

    assert!(table.height() > 100);
    assert!(out.canonical().has_column("MA20_AAPL"));
    assert!(out.canonical().has_column("MA20_TCS.NS"));
    assert!(!out.canonical().has_column("Close_BADTICKER"));
    assert!(client.fetch_latest_quote("BADTICKER").is_err());
}
