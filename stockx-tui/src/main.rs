//! STOCK.X TUI: a terminal stock dashboard with vim-style navigation.
//!
//! Panels:
//! 1. Overview: first rows of the combined price table
//! 2. Price: closing price over time
//! 3. Moving Average: rolling mean of the close
//! 4. Volume: stacked daily volume
//! 5. Fundamentals: company profile and key metrics
//! 6. Help: keyboard shortcuts

mod app;
mod input;
mod theme;
mod ui;

use std::fs::{self, File};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockx_core::data::{SyntheticProvider, YahooProvider};
use stockx_core::QuoteClient;
use stockx_dashboard::DashboardConfig;

use crate::app::AppState;

#[derive(Parser, Debug)]
#[command(name = "stockx-tui", version, about = "STOCK.X terminal dashboard")]
struct Args {
    /// Config file (default: <config dir>/stockx/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use deterministic offline data instead of Yahoo Finance
    #[arg(long)]
    synthetic: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;

    let config = DashboardConfig::load(args.config.as_deref())?;
    let today = chrono::Local::now().date_naive();
    let client: Box<dyn QuoteClient> = if args.synthetic {
        Box::new(SyntheticProvider::new(today))
    } else {
        Box::new(
            YahooProvider::new(&config.provider.yahoo_options())
                .context("building HTTP client")?,
        )
    };
    info!(client = client.name(), "starting tui");

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut app = AppState::new(config, client, today);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // First pass with the configured defaults.
    app.refresh();
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }
    }
    Ok(())
}

/// Log to a file under the cache dir; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockx");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = File::create(dir.join("tui.log")).context("creating log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("STOCKX_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
