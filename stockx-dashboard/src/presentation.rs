//! Presentation adapter.
//!
//! Slices per-symbol series out of the indicator table and packages them as
//! renderer-neutral chart specs, plus the overview preview and the
//! fundamentals panel text. Nothing here mutates the table.

use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataFrame, PolarsResult};
use stockx_core::data::Metric;
use stockx_core::{Fundamentals, IndicatorTable, SymbolSet};

/// Placeholder for any absent value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Marker appended to a truncated summary.
pub const ELLIPSIS: &str = "...";

/// One `{date, value}` series for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesView {
    pub symbol: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// The three chartable series of a symbol, each present only if its column is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SymbolViews {
    pub close: Option<SeriesView>,
    pub moving_average: Option<SeriesView>,
    pub volume: Option<SeriesView>,
}

fn series(table: &IndicatorTable, symbol: &str, column: &str) -> Option<SeriesView> {
    let canonical = table.canonical();
    canonical.column(column).map(|values| SeriesView {
        symbol: symbol.to_string(),
        dates: canonical.dates().to_vec(),
        values: values.to_vec(),
    })
}

pub fn symbol_views(table: &IndicatorTable, symbol: &str) -> SymbolViews {
    SymbolViews {
        close: series(table, symbol, &Metric::Close.column_name(symbol)),
        moving_average: series(table, symbol, &table.ma_column(symbol)),
        volume: series(table, symbol, &Metric::Volume.column_name(symbol)),
    }
}

/// How traces on one chart combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    /// Independent lines on a shared axis.
    Overlay,
    /// Cumulative areas.
    Stack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Price,
    MovingAverage,
    Volume,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// A renderer-neutral chart: labelled traces over one date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub mode: ChartMode,
    pub dates: Vec<NaiveDate>,
    pub traces: Vec<Trace>,
}

impl ChartSpec {
    /// Values as drawn: unchanged for overlay, running per-date sums across
    /// traces for stack. An undefined value adds nothing to the running sum
    /// and stays undefined in its own trace.
    pub fn plotted(&self) -> Vec<Trace> {
        match self.mode {
            ChartMode::Overlay => self.traces.clone(),
            ChartMode::Stack => {
                let mut running = vec![0.0; self.dates.len()];
                self.traces
                    .iter()
                    .map(|trace| Trace {
                        label: trace.label.clone(),
                        values: trace
                            .values
                            .iter()
                            .enumerate()
                            .map(|(i, v)| {
                                v.map(|v| {
                                    running[i] += v;
                                    running[i]
                                })
                            })
                            .collect(),
                    })
                    .collect()
            }
        }
    }

    /// Min and max over the plotted values, if any are defined.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        self.plotted()
            .iter()
            .flat_map(|t| t.values.iter().flatten().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Price, moving-average, and volume charts for the selected symbols.
///
/// A symbol missing from the table is skipped; a chart with no traces is
/// omitted, so an empty table yields no charts.
pub fn build_charts(table: &IndicatorTable, symbols: &SymbolSet) -> Vec<ChartSpec> {
    if table.canonical().is_empty() {
        return Vec::new();
    }

    let window = table.window();
    let views: Vec<SymbolViews> = symbols.iter().map(|s| symbol_views(table, s)).collect();
    let dates = table.canonical().dates().to_vec();

    let chart = |kind, title: String, y_label: &str, mode, traces: Vec<Trace>| ChartSpec {
        kind,
        title,
        x_label: "Date".into(),
        y_label: y_label.into(),
        mode,
        dates: dates.clone(),
        traces,
    };

    let traces = |pick: fn(&SymbolViews) -> Option<&SeriesView>, suffix: &str| -> Vec<Trace> {
        views
            .iter()
            .filter_map(pick)
            .map(|view| Trace {
                label: format!("{}{suffix}", view.symbol),
                values: view.values.clone(),
            })
            .collect()
    };

    let ma_suffix = format!(" MA{window}");
    [
        chart(
            ChartKind::Price,
            "Closing Price Over Time".into(),
            "Price",
            ChartMode::Overlay,
            traces(|v| v.close.as_ref(), ""),
        ),
        chart(
            ChartKind::MovingAverage,
            format!("{window}-Day Moving Average"),
            "Price",
            ChartMode::Overlay,
            traces(|v| v.moving_average.as_ref(), &ma_suffix),
        ),
        chart(
            ChartKind::Volume,
            "Daily Volume Traded".into(),
            "Volume",
            ChartMode::Stack,
            traces(|v| v.volume.as_ref(), ""),
        ),
    ]
    .into_iter()
    .filter(|c| !c.traces.is_empty())
    .collect()
}

/// The first `rows` rows of the table as a polars frame.
pub fn overview(table: &IndicatorTable, rows: usize) -> PolarsResult<DataFrame> {
    table.canonical().head_frame(rows)
}

/// Overview frame rendered to strings for text surfaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverviewPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OverviewPreview {
    pub fn from_frame(df: &DataFrame) -> Self {
        let columns = df
            .get_column_names()
            .iter()
            .map(|c| c.to_string())
            .collect();
        let rows = (0..df.height())
            .map(|i| {
                df.get_columns()
                    .iter()
                    .map(|col| match col.get(i) {
                        Ok(AnyValue::Null) | Err(_) => String::new(),
                        Ok(AnyValue::Float64(v)) => v.to_string(),
                        Ok(value) => value.to_string(),
                    })
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One `label: value` line of a metric group.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricLine {
    pub label: &'static str,
    pub value: String,
}

/// Company header, shortened description, and two metric groups.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalsPanel {
    pub symbol: String,
    pub title: String,
    pub about: String,
    pub key_metrics: Vec<MetricLine>,
    pub more_insights: Vec<MetricLine>,
}

/// First `budget` characters plus an ellipsis if the text is longer.
pub fn truncate_summary(text: &str, budget: usize) -> String {
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Group the digits of an integer string by thousands.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567.891` -> `1,234,567.89`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{}.{frac}", group_digits(int_part))
}

pub fn format_count(value: u64) -> String {
    group_digits(&value.to_string())
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn fundamentals_panel(symbol: &str, info: &Fundamentals, budget: usize) -> FundamentalsPanel {
    let about = info
        .long_business_summary
        .as_deref()
        .map(|s| truncate_summary(s, budget))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    FundamentalsPanel {
        symbol: symbol.to_string(),
        title: format!(
            "{symbol} - {}",
            info.short_name.as_deref().unwrap_or(NOT_AVAILABLE)
        ),
        about,
        key_metrics: vec![
            MetricLine {
                label: "Sector",
                value: or_na(info.sector.as_deref()),
            },
            MetricLine {
                label: "Market Cap",
                value: or_na(info.market_cap.map(format_count)),
            },
            MetricLine {
                label: "P/E Ratio",
                value: or_na(info.trailing_pe),
            },
            MetricLine {
                label: "EPS",
                value: or_na(info.trailing_eps),
            },
        ],
        more_insights: vec![
            MetricLine {
                label: "Dividend Yield",
                value: or_na(info.dividend_yield),
            },
            MetricLine {
                label: "52W High",
                value: or_na(info.fifty_two_week_high),
            },
            MetricLine {
                label: "52W Low",
                value: or_na(info.fifty_two_week_low),
            },
            MetricLine {
                label: "Beta",
                value: or_na(info.beta),
            },
        ],
    }
}
