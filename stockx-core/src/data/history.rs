//! History fetch variants.
//!
//! `fetch_single` yields a flat table, `fetch_multi` a compound one. Both are
//! normalized to the same canonical shape; `fetch_history` picks the variant
//! by symbol count.

use super::align::align_symbols;
use super::provider::{DataError, QuoteClient};
use super::raw::{CompoundTable, FlatTable, RawSeriesTable};
use crate::domain::{SymbolSet, TimeRange};
use tracing::{debug, warn};

/// Fetch one symbol as a flat-labelled table.
pub fn fetch_single(
    client: &dyn QuoteClient,
    symbol: &str,
    range: &TimeRange,
) -> Result<RawSeriesTable, DataError> {
    debug!(client = client.name(), symbol, %range, "fetching single-symbol history");
    let mut history = client.fetch_symbol_history(symbol, range)?;
    debug!(
        symbol,
        source = ?history.source,
        bars = history.bars.len(),
        "history received"
    );
    history.bars.retain(|b| range.contains(b.date));
    Ok(RawSeriesTable::Flat(FlatTable::from_history(history)))
}

/// Fetch several symbols as a compound-labelled table.
///
/// A symbol that fails or returns no bars is dropped from the table and
/// listed in `dropped()`; the remaining symbols are unaffected.
pub fn fetch_multi(
    client: &dyn QuoteClient,
    symbols: &SymbolSet,
    range: &TimeRange,
) -> RawSeriesTable {
    let mut histories = Vec::with_capacity(symbols.len());
    let mut dropped = Vec::new();

    for symbol in symbols.iter() {
        debug!(client = client.name(), symbol, %range, "fetching history");
        match client.fetch_symbol_history(symbol, range) {
            Ok(mut history) => {
                debug!(
        symbol,
        source = ?history.source,
        bars = history.bars.len(),
        "history received"
    );
                history.bars.retain(|b| range.contains(b.date));
                if history.bars.is_empty() {
                    warn!(symbol, "provider returned no bars in range, dropping");
                    dropped.push(symbol.to_string());
                } else {
                    histories.push(history);
                }
            }
            Err(e) => {
                warn!(
                    symbol,
                    category = e.category(),
                    error = %e,
                    "history fetch failed, dropping"
                );
                dropped.push(symbol.to_string());
            }
        }
    }

    if histories.is_empty() {
        return RawSeriesTable::empty_with_dropped(dropped);
    }

    RawSeriesTable::Compound(CompoundTable::from_aligned(align_symbols(histories), dropped))
}

/// Fetch history for a symbol set: empty for no symbols, flat for one,
/// compound for several.
pub fn fetch_history(
    client: &dyn QuoteClient,
    symbols: &SymbolSet,
    range: &TimeRange,
) -> Result<RawSeriesTable, DataError> {
    match symbols.as_slice() {
        [] => Ok(RawSeriesTable::empty()),
        [only] => fetch_single(client, only, range),
        _ => Ok(fetch_multi(client, symbols, range)),
    }
}
