//! STOCK.X CLI: one-shot dashboard renders and CSV export.
//!
//! Commands:
//! - `view`: run a render pass and print it as text
//! - `export`: write the combined price table to CSV
//! - `quote`: latest price and change for symbols
//! - `indices`: the configured market indices
//! - `catalog`: list the selectable symbols

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockx_core::data::{SyntheticProvider, YahooProvider};
use stockx_core::{QuoteClient, RangePreset, SymbolSet, TimeRange};
use stockx_dashboard::{
    indicator_table, load_indices, load_watchlist, render_pass, write_csv, DashboardConfig,
    IndexPanel, RenderRequest, WatchEntry,
};

#[derive(Parser)]
#[command(name = "stockx", version, about = "STOCK.X: stock dashboard from the command line")]
struct Cli {
    /// Config file (default: <config dir>/stockx/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use deterministic offline data instead of Yahoo Finance
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct Selection {
    /// Symbols to show. Defaults to the configured default symbols.
    #[arg(short = 's', long = "symbols", num_args = 1.., value_delimiter = ',')]
    symbols: Vec<String>,

    /// Range preset: Today, 1M, 6M, 1Y, 3Y, 5Y, Max.
    #[arg(long)]
    range: Option<RangePreset>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a render pass and print the dashboard.
    View {
        #[command(flatten)]
        selection: Selection,

        /// Comma-separated watchlist symbols.
        #[arg(long, default_value = "")]
        watchlist: String,
    },
    /// Export the combined price table to CSV.
    Export {
        #[command(flatten)]
        selection: Selection,

        /// Output path. Defaults to the configured export file.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Latest price and change for each symbol.
    Quote {
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Latest values of the configured market indices.
    Indices,
    /// List the selectable symbols.
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config = DashboardConfig::load(cli.config.as_deref())?;
    let today = cli.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    let client = build_client(&config, cli.synthetic, today)?;
    info!(client = client.name(), %today, "stockx starting");

    match cli.command {
        Commands::View {
            selection,
            watchlist,
        } => {
            let request = RenderRequest {
                symbols: resolve_symbols(&config, &selection.symbols),
                range: resolve_range(&config, selection.range, today),
                watchlist_text: watchlist,
            };
            let view = render_pass(client.as_ref(), &request, &config);
            print!("{}", report::render_view(&view));
        }
        Commands::Export { selection, output } => {
            let symbols = resolve_symbols(&config, &selection.symbols);
            let range = resolve_range(&config, selection.range, today);
            let table =
                indicator_table(client.as_ref(), &symbols, &range, config.moving_average_window)?;
            let path = output.unwrap_or_else(|| config.export_file.clone());
            write_csv(table.canonical(), &path)?;
            println!(
                "Wrote {} row(s) for {} symbol(s) to {}",
                table.canonical().height(),
                symbols.len(),
                path.display()
            );
        }
        Commands::Quote { symbols } => {
            let text = symbols.join(",");
            let entries = load_watchlist(
                client.as_ref(),
                &text,
                &config.currency_symbol,
                config.provider.parallel_fetch,
            );
            for entry in entries {
                match entry {
                    WatchEntry::Quote(q) => println!("{}", report::quote_line(&q)),
                    WatchEntry::Warning { message, error, .. } => {
                        eprintln!("warning: {message}: {error}")
                    }
                }
            }
        }
        Commands::Indices => {
            let panel = load_indices(
                client.as_ref(),
                &config.indices,
                &config.index_failure_notice,
                &config.currency_symbol,
                config.provider.parallel_fetch,
            );
            match panel {
                IndexPanel::Quotes(quotes) => {
                    for q in &quotes {
                        println!("{}", report::quote_line(q));
                    }
                }
                IndexPanel::Unavailable { notice, errors } => {
                    println!("{notice}");
                    for e in errors {
                        eprintln!("  {e}");
                    }
                }
            }
        }
        Commands::Catalog => {
            for symbol in &config.catalog {
                let mark = if config.default_symbols.contains(symbol) {
                    "*"
                } else {
                    " "
                };
                println!("{mark} {symbol}");
            }
        }
    }

    Ok(())
}

fn build_client(
    config: &DashboardConfig,
    synthetic: bool,
    today: NaiveDate,
) -> Result<Box<dyn QuoteClient>> {
    if synthetic {
        return Ok(Box::new(SyntheticProvider::new(today)));
    }
    let provider =
        YahooProvider::new(&config.provider.yahoo_options()).context("building HTTP client")?;
    Ok(Box::new(provider))
}

fn resolve_symbols(config: &DashboardConfig, given: &[String]) -> SymbolSet {
    if given.is_empty() {
        SymbolSet::new(&config.default_symbols)
    } else {
        given.iter().map(|s| s.trim().to_uppercase()).collect()
    }
}

fn resolve_range(
    config: &DashboardConfig,
    preset: Option<RangePreset>,
    today: NaiveDate,
) -> TimeRange {
    TimeRange::from_preset(preset.unwrap_or(config.default_range), today)
}

/// Logs go to stderr so stdout stays clean for reports.
fn init_logging() {
    let filter = EnvFilter::try_from_env("STOCKX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
