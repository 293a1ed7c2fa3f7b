//! Application state, owned by the main thread.
//!
//! All TUI state lives here. A render pass is run synchronously on demand and
//! its view model replaces the previous one wholesale.

use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime};

use stockx_core::{DataError, QuoteClient, RangePreset, SymbolSet, TimeRange};
use stockx_dashboard::{
    render_pass, write_csv, DashboardConfig, DashboardView, FundamentalsEntry, IndexPanel,
    RenderRequest, TradeAction, WatchEntry,
};
use tracing::info;

/// Which main-area panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Overview,
    Price,
    MovingAverage,
    Volume,
    Fundamentals,
    Help,
}

impl Panel {
    pub fn index(self) -> usize {
        match self {
            Panel::Overview => 0,
            Panel::Price => 1,
            Panel::MovingAverage => 2,
            Panel::Volume => 3,
            Panel::Fundamentals => 4,
            Panel::Help => 5,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Overview),
            1 => Some(Panel::Price),
            2 => Some(Panel::MovingAverage),
            3 => Some(Panel::Volume),
            4 => Some(Panel::Fundamentals),
            5 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Overview => "Market Overview",
            Panel::Price => "Price Trend",
            Panel::MovingAverage => "Moving Average",
            Panel::Volume => "Volume Traded",
            Panel::Fundamentals => "Fundamentals",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % 6).unwrap_or(Panel::Overview)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + 5) % 6).unwrap_or(Panel::Overview)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    NotFound,
    RateLimit,
    Data,
    Export,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::NotFound => "404",
            ErrorCategory::RateLimit => "RATE",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Export => "CSV",
            ErrorCategory::Other => "ERR",
        }
    }

    pub fn from_data_error(err: &DataError) -> Self {
        match err {
            DataError::NetworkUnreachable { .. } => ErrorCategory::Network,
            DataError::SymbolNotFound { .. } => ErrorCategory::NotFound,
            DataError::RateLimited { .. } => ErrorCategory::RateLimit,
            DataError::ResponseFormatChanged { .. } | DataError::InsufficientHistory { .. } => {
                ErrorCategory::Data
            }
            DataError::AuthenticationRequired { .. } => ErrorCategory::Other,
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Watchlist,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Inputs of the next render pass
    pub config: DashboardConfig,
    pub catalog_cursor: usize,
    pub selected: SymbolSet,
    pub range: RangePreset,
    pub watchlist_text: String,
    pub watchlist_input: String,

    // Output of the last render pass
    pub view: Option<DashboardView>,
    pub scroll: u16,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    client: Box<dyn QuoteClient>,
    today: NaiveDate,
}

impl AppState {
    pub fn new(config: DashboardConfig, client: Box<dyn QuoteClient>, today: NaiveDate) -> Self {
        let selected = SymbolSet::new(config.default_symbols.iter());
        let range = config.default_range;
        Self {
            active_panel: Panel::Overview,
            running: true,
            config,
            catalog_cursor: 0,
            selected,
            range,
            watchlist_text: String::new(),
            watchlist_input: String::new(),
            view: None,
            scroll: 0,
            status_message: None,
            error_history: VecDeque::with_capacity(50),
            error_scroll: 0,
            overlay: Overlay::None,
            client,
            today,
        }
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::from_preset(self.range, self.today)
    }

    pub fn cursor_symbol(&self) -> Option<&str> {
        self.config
            .catalog
            .get(self.catalog_cursor)
            .map(String::as_str)
    }

    pub fn move_cursor(&mut self, down: bool) {
        let len = self.config.catalog.len();
        if len == 0 {
            return;
        }
        self.catalog_cursor = if down {
            (self.catalog_cursor + 1).min(len - 1)
        } else {
            self.catalog_cursor.saturating_sub(1)
        };
    }

    pub fn toggle_cursor(&mut self) {
        if let Some(symbol) = self.cursor_symbol().map(str::to_string) {
            self.selected.toggle(&symbol);
        }
    }

    pub fn cycle_range(&mut self, forward: bool) {
        self.range = if forward {
            self.range.next()
        } else {
            self.range.prev()
        };
        self.set_status(format!("Range: {} (Enter to refresh)", self.range));
    }

    pub fn request(&self) -> RenderRequest {
        RenderRequest {
            symbols: self.selected.clone(),
            range: self.time_range(),
            watchlist_text: self.watchlist_text.clone(),
        }
    }

    /// Run a render pass and replace the view.
    pub fn refresh(&mut self) {
        let request = self.request();
        let view = render_pass(self.client.as_ref(), &request, &self.config);
        self.scroll = 0;

        let mut warnings = 0;
        if let IndexPanel::Unavailable { notice, errors } = &view.indices {
            for err in errors.clone() {
                let category = ErrorCategory::from_data_error(&err);
                self.push_error(category, notice.clone(), err.to_string());
            }
            warnings += 1;
        }
        for entry in view.watchlist.clone() {
            if let WatchEntry::Warning { message, error, .. } = entry {
                let category = ErrorCategory::from_data_error(&error);
                self.push_error(category, message, error.to_string());
                warnings += 1;
            }
        }
        if let Some(panel) = view.main_panel() {
            for entry in panel.fundamentals.clone() {
                if let FundamentalsEntry::Warning { message, error, .. } = entry {
                    let category = ErrorCategory::from_data_error(&error);
                    self.push_error(category, message, error.to_string());
                    warnings += 1;
                }
            }
            for symbol in panel.missing.clone() {
                self.push_error(
                    ErrorCategory::Data,
                    format!("No price data for {symbol}"),
                    format!("range {}", request.range),
                );
                warnings += 1;
            }
        }

        info!(symbols = request.symbols.len(), warnings, "dashboard refreshed");
        self.view = Some(view);
        let msg = format!(
            "Loaded {} symbol(s) over {} [{}]",
            request.symbols.len(),
            self.range,
            request.range
        );
        if warnings == 0 {
            self.set_status(msg);
        } else {
            self.set_warning(format!("{msg} with {warnings} warning(s), press e"));
        }
    }

    /// Write the displayed table to the configured export file.
    pub fn export(&mut self) {
        let Some(panel) = self.view.as_ref().and_then(DashboardView::main_panel) else {
            self.set_warning("Nothing to export: refresh with at least one symbol selected");
            return;
        };
        let path = self.config.export_file.clone();
        match write_csv(panel.table.canonical(), &path) {
            Ok(()) => self.set_status(format!("Exported {}", path.display())),
            Err(e) => self.push_error(
                ErrorCategory::Export,
                "CSV export failed".into(),
                format!("{e:#}"),
            ),
        }
    }

    /// Buy/Sell are inert: they only acknowledge the key press.
    pub fn trade_action(&mut self, action: TradeAction) {
        match self.cursor_symbol().map(str::to_string) {
            Some(symbol) if self.selected.contains(&symbol) => {
                let label = action.label(&symbol);
                self.set_status(format!("{label}: order execution is not available"));
            }
            Some(symbol) => self.set_warning(format!("Select {symbol} first")),
            None => {}
        }
    }

    pub fn open_watchlist(&mut self) {
        self.watchlist_input = self.watchlist_text.clone();
        self.overlay = Overlay::Watchlist;
    }

    pub fn commit_watchlist(&mut self) {
        self.watchlist_text = std::mem::take(&mut self.watchlist_input);
        self.overlay = Overlay::None;
        self.refresh();
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > 50 {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
