//! STOCK.X dashboard: render pass, presentation, watchlist, export.
//!
//! This crate builds on `stockx-core` to provide:
//! - TOML configuration with defaults and validation
//! - The explicit render pass: `(symbols, range, watchlist text)` in, view model out
//! - The presentation adapter (chart specs, overview preview, fundamentals panels)
//! - The watchlist / index quote service with per-symbol failure isolation
//! - CSV export of the indicator table

pub mod config;
pub mod export;
pub mod presentation;
pub mod render;
pub mod watchlist;

pub use config::{ConfigError, DashboardConfig, IndexEntry, ProviderConfig};
pub use export::{export_csv, write_csv};
pub use presentation::{
    build_charts, fundamentals_panel, overview, symbol_views, truncate_summary, ChartKind,
    ChartMode, ChartSpec, FundamentalsPanel, OverviewPreview, SeriesView, SymbolViews, Trace,
};
pub use render::{
    indicator_table, render_pass, DashboardView, FundamentalsEntry, MainPanel, MainView,
    RenderRequest, TradeAction, NO_SELECTION_MESSAGE,
};
pub use watchlist::{
    load_indices, load_watchlist, parse_watchlist, IndexPanel, QuoteView, WatchEntry,
};
