//! Plain-text rendering of a dashboard view.

use std::fmt::Write;

use stockx_dashboard::{
    ChartSpec, DashboardView, FundamentalsEntry, IndexPanel, MainView, OverviewPreview, QuoteView,
    WatchEntry,
};

/// `change` already carries its own minus sign.
pub fn quote_line(q: &QuoteView) -> String {
    format!("{:<12} {:>14} {:>8}", q.label, q.price, q.change)
}

pub fn render_view(view: &DashboardView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "STOCK.X: Choose and grow high");
    let _ = writeln!(out, "Range: {}\n", view.range);

    let _ = writeln!(out, "== Indices ==");
    match &view.indices {
        IndexPanel::Quotes(quotes) => {
            for q in quotes {
                let _ = writeln!(out, "{}", quote_line(q));
            }
        }
        IndexPanel::Unavailable { notice, .. } => {
            let _ = writeln!(out, "{notice}");
        }
    }

    if !view.watchlist.is_empty() {
        let _ = writeln!(out, "\n== Watchlist ==");
        for entry in &view.watchlist {
            let _ = match entry {
                WatchEntry::Quote(q) => writeln!(out, "{}", quote_line(q)),
                WatchEntry::Warning { message, .. } => writeln!(out, "warning: {message}"),
            };
        }
    }

    let _ = writeln!(out);
    let panel = match &view.main {
        MainView::NoSelection { message } => {
            let _ = writeln!(out, "{message}");
            return out;
        }
        MainView::Selected(panel) => panel,
    };

    let _ = writeln!(out, "== Market Overview ==");
    if !panel.missing.is_empty() {
        let _ = writeln!(out, "no data for: {}", panel.missing.join(", "));
    }
    out.push_str(&render_table(&panel.overview));

    for chart in &panel.charts {
        out.push('\n');
        out.push_str(&render_chart(chart));
    }

    for entry in &panel.fundamentals {
        out.push('\n');
        match entry {
            FundamentalsEntry::Panel(p) => {
                let _ = writeln!(out, "== {} ({}) ==", p.title, p.symbol);
                let _ = writeln!(out, "About: {}", p.about);
                let groups = [
                    ("Key Metrics", &p.key_metrics),
                    ("More Insights", &p.more_insights),
                ];
                for (heading, metrics) in groups {
                    let _ = writeln!(out, "{heading}:");
                    for m in metrics {
                        let _ = writeln!(out, "  {:<18}{}", m.label, m.value);
                    }
                }
            }
            FundamentalsEntry::Warning { message, .. } => {
                let _ = writeln!(out, "warning: {message}");
            }
        }
    }

    let actions: Vec<String> = panel
        .actions
        .iter()
        .flat_map(|(symbol, pair)| pair.iter().map(move |a| format!("[{}]", a.label(symbol))))
        .collect();
    if !actions.is_empty() {
        let _ = writeln!(out, "\n{}", actions.join(" "));
    }
    out
}

/// Fixed-width table; column width follows the widest cell.
pub fn render_table(preview: &OverviewPreview) -> String {
    let widths: Vec<usize> = preview
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            preview
                .rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:>w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", line(&preview.columns));
    for row in &preview.rows {
        let _ = writeln!(out, "{}", line(row));
    }
    out
}

/// Chart title plus each trace's last plotted value.
pub fn render_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ({} vs {}) ==", chart.title, chart.y_label, chart.x_label);
    let last = chart.dates.last().map(|d| d.to_string()).unwrap_or_default();
    for trace in chart.plotted() {
        let value = trace
            .values
            .iter()
            .rev()
            .flatten()
            .next()
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "N/A".into());
        let _ = writeln!(out, "  {:<14} {value} ({last})", trace.label);
    }
    out
}
