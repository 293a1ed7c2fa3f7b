//! Watchlist and index quote service.
//!
//! Watchlist symbols fail one at a time: a bad ticker yields a warning for
//! that ticker only. The fixed index pair fails as a unit with one notice.

use crate::config::IndexEntry;
use crate::presentation::format_amount;
use rayon::prelude::*;
use stockx_core::{DataError, Quote, QuoteClient};
use tracing::warn;

/// A quote formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteView {
    pub label: String,
    /// `<currency><thousands-separated, 2dp>`
    pub price: String,
    /// `<2dp>%`
    pub change: String,
    pub quote: Quote,
}

impl QuoteView {
    pub fn new(label: &str, quote: Quote, currency: &str) -> Self {
        Self {
            label: label.to_string(),
            price: format!("{currency}{}", format_amount(quote.price)),
            change: format!("{:.2}%", quote.pct_change),
            quote,
        }
    }

    pub fn is_up(&self) -> bool {
        self.quote.pct_change >= 0.0
    }
}

/// One watchlist line: a quote, or a local warning for that symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEntry {
    Quote(QuoteView),
    Warning {
        symbol: String,
        message: String,
        error: DataError,
    },
}

impl WatchEntry {
    pub fn symbol(&self) -> &str {
        match self {
            WatchEntry::Quote(view) => &view.quote.symbol,
            WatchEntry::Warning { symbol, .. } => symbol,
        }
    }
}

/// The index pair: both quotes, or the combined notice.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexPanel {
    Quotes(Vec<QuoteView>),
    Unavailable {
        notice: String,
        errors: Vec<DataError>,
    },
}

/// Split on commas, trim, upper-case, and drop blank tokens.
pub fn parse_watchlist(text: &str) -> Vec<String> {
    text.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn map_in_order<T, R, F>(items: &[T], parallel: bool, f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Fetch a quote for every watchlist symbol, in input order.
pub fn load_watchlist(
    client: &dyn QuoteClient,
    text: &str,
    currency: &str,
    parallel: bool,
) -> Vec<WatchEntry> {
    let symbols = parse_watchlist(text);
    map_in_order(&symbols, parallel, |symbol| {
        match client.fetch_latest_quote(symbol) {
            Ok(quote) => WatchEntry::Quote(QuoteView::new(symbol, quote, currency)),
            Err(error) => {
                warn!(
                    symbol = symbol.as_str(),
                    category = error.category(),
                    error = %error,
                    "watchlist quote failed"
                );
                WatchEntry::Warning {
                    symbol: symbol.clone(),
                    message: format!("Could not load {symbol}"),
                    error,
                }
            }
        }
    })
}

/// Fetch the fixed index pair. Any failure degrades the whole panel.
pub fn load_indices(
    client: &dyn QuoteClient,
    indices: &[IndexEntry],
    notice: &str,
    currency: &str,
    parallel: bool,
) -> IndexPanel {
    let results = map_in_order(indices, parallel, |entry| {
        client
            .fetch_latest_quote(&entry.symbol)
            .map(|quote| QuoteView::new(&entry.label, quote, currency))
    });

    let mut views = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(view) => views.push(view),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        IndexPanel::Quotes(views)
    } else {
        for e in &errors {
            warn!(symbol = e.symbol(), category = e.category(), error = %e, "index quote failed");
        }
        IndexPanel::Unavailable {
            notice: notice.to_string(),
            errors,
        }
    }
}
