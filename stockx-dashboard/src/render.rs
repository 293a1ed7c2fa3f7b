//! The render pass.
//!
//! One call takes the selected symbols, the time range, and the watchlist
//! text, and returns a complete view model. Nothing is carried between
//! calls: every pass builds and drops its own tables and quotes.

use crate::config::DashboardConfig;
use crate::presentation::{
    build_charts, fundamentals_panel, overview, ChartSpec, FundamentalsPanel, OverviewPreview,
};
use crate::watchlist::{load_indices, load_watchlist, IndexPanel, WatchEntry};
use rayon::prelude::*;
use stockx_core::{
    add_moving_average, fetch_history, normalize, DataError, IndicatorTable, QuoteClient,
    SymbolSet, TimeRange,
};
use stockx_core::data::Metric;
use tracing::{debug, info, warn};

pub const NO_SELECTION_MESSAGE: &str = "Please select at least one stock symbol to view data.";

/// Explicit inputs of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub symbols: SymbolSet,
    pub range: TimeRange,
    pub watchlist_text: String,
}

/// Inert trade action. Selecting it does nothing beyond a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn label(self, symbol: &str) -> String {
        match self {
            TradeAction::Buy => format!("Buy {symbol}"),
            TradeAction::Sell => format!("Sell {symbol}"),
        }
    }
}

/// Fundamentals for one selected symbol, or a local warning.
#[derive(Debug, Clone, PartialEq)]
pub enum FundamentalsEntry {
    Panel(FundamentalsPanel),
    Warning {
        symbol: String,
        message: String,
        error: DataError,
    },
}

#[derive(Debug, Clone)]
pub struct MainPanel {
    pub table: IndicatorTable,
    /// Requested symbols with no columns in the table.
    pub missing: Vec<String>,
    pub overview: OverviewPreview,
    pub charts: Vec<ChartSpec>,
    pub fundamentals: Vec<FundamentalsEntry>,
    /// Per selected symbol, in selection order.
    pub actions: Vec<(String, [TradeAction; 2])>,
}

#[derive(Debug, Clone)]
pub enum MainView {
    NoSelection { message: String },
    Selected(Box<MainPanel>),
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub range: TimeRange,
    pub indices: IndexPanel,
    pub watchlist: Vec<WatchEntry>,
    pub main: MainView,
}

impl DashboardView {
    pub fn main_panel(&self) -> Option<&MainPanel> {
        match &self.main {
            MainView::Selected(panel) => Some(panel.as_ref()),
            MainView::NoSelection { .. } => None,
        }
    }
}

/// Run fetch → normalize → indicate → present for one request.
pub fn render_pass(
    client: &dyn QuoteClient,
    request: &RenderRequest,
    config: &DashboardConfig,
) -> DashboardView {
    let parallel = config.provider.parallel_fetch;
    let currency = config.currency_symbol.as_str();

    let indices = load_indices(
        client,
        &config.indices,
        &config.index_failure_notice,
        currency,
        parallel,
    );
    let watchlist = load_watchlist(client, &request.watchlist_text, currency, parallel);

    let main = if request.symbols.is_empty() {
        MainView::NoSelection {
            message: NO_SELECTION_MESSAGE.to_string(),
        }
    } else {
        MainView::Selected(Box::new(main_panel(client, request, config)))
    };

    DashboardView {
        range: request.range,
        indices,
        watchlist,
        main,
    }
}

/// Fetch, normalize, and add the moving average for `symbols` over `range`.
pub fn indicator_table(
    client: &dyn QuoteClient,
    symbols: &SymbolSet,
    range: &TimeRange,
    window: usize,
) -> Result<IndicatorTable, DataError> {
    let raw = fetch_history(client, symbols, range)?;
    let canonical = normalize(&raw, symbols);
    Ok(add_moving_average(&canonical, symbols, window))
}

fn main_panel(
    client: &dyn QuoteClient,
    request: &RenderRequest,
    config: &DashboardConfig,
) -> MainPanel {
    let symbols = &request.symbols;
    let window = config.moving_average_window;

    let table = indicator_table(client, symbols, &request.range, window).unwrap_or_else(|e| {
        warn!(
            symbol = e.symbol(),
            category = e.category(),
            error = %e,
            "history unavailable, rendering empty table"
        );
        IndicatorTable::empty(window)
    });

    let missing: Vec<String> = symbols
        .iter()
        .filter(|s| {
            !Metric::ALL
                .iter()
                .any(|m| table.canonical().has_column(&m.column_name(s)))
        })
        .map(str::to_string)
        .collect();

    let overview = match overview(&table, config.overview_rows) {
        Ok(df) => OverviewPreview::from_frame(&df),
        Err(e) => {
            warn!(error = %e, "overview frame unavailable");
            OverviewPreview::default()
        }
    };

    let charts = build_charts(&table, symbols);
    let fundamentals = load_fundamentals(client, symbols, config);
    let actions = symbols
        .iter()
        .map(|s| (s.to_string(), [TradeAction::Buy, TradeAction::Sell]))
        .collect();

    info!(
        symbols = symbols.len(),
        rows = table.canonical().height(),
        missing = missing.len(),
        charts = charts.len(),
        range = %request.range,
        "render pass complete"
    );

    MainPanel {
        table,
        missing,
        overview,
        charts,
        fundamentals,
        actions,
    }
}

fn load_fundamentals(
    client: &dyn QuoteClient,
    symbols: &SymbolSet,
    config: &DashboardConfig,
) -> Vec<FundamentalsEntry> {
    let one = |symbol: &String| match client.fetch_fundamentals(symbol) {
        Ok(info) => {
            if info.is_blank() {
                debug!(symbol = symbol.as_str(), "provider returned no company fields");
            }
            FundamentalsEntry::Panel(fundamentals_panel(
                symbol,
                &info,
                config.summary_char_budget,
            ))
        }
        Err(error) => {
            warn!(
                symbol = symbol.as_str(),
                category = error.category(),
                error = %error,
                "fundamentals unavailable"
            );
            FundamentalsEntry::Warning {
                symbol: symbol.clone(),
                message: format!("Could not load {symbol}"),
                error,
            }
        }
    };

    if config.provider.parallel_fetch {
        symbols.as_slice().par_iter().map(one).collect()
    } else {
        symbols.as_slice().iter().map(one).collect()
    }
}
