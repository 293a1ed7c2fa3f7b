//! Panel 1: first rows of the combined table plus the trade action row.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use stockx_dashboard::{MainPanel, TradeAction};

use crate::app::AppState;
use crate::theme;
use crate::ui::{has_data, render_hint};

const COLUMN_WIDTH: u16 = 14;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, main: &MainPanel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(2),
        ])
        .split(area);

    let mut header = vec![Span::styled(
        format!(" {} row(s) loaded", main.table.canonical().height()),
        theme::muted(),
    )];
    if !main.missing.is_empty() {
        header.push(Span::styled(
            format!("   no data for: {}", main.missing.join(", ")),
            theme::warning(),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    if has_data(main) {
        render_table(f, chunks[1], app, main);
    } else {
        render_hint(f, chunks[1], "No price data in the selected range.");
    }

    let mut actions: Vec<Span> = vec![Span::styled(" b/s ", theme::muted())];
    for (symbol, pair) in &main.actions {
        for action in pair {
            let style = match action {
                TradeAction::Buy => theme::positive(),
                TradeAction::Sell => theme::negative(),
            };
            actions.push(Span::styled(format!("[{}]", action.label(symbol)), style));
            actions.push(Span::raw(" "));
        }
    }
    f.render_widget(Paragraph::new(Line::from(actions)), chunks[2]);
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState, main: &MainPanel) {
    let preview = &main.overview;
    let skip = app.scroll as usize;

    // Date stays pinned; the rest scroll horizontally with PageUp/PageDown.
    let visible: Vec<usize> = std::iter::once(0)
        .chain((1..preview.columns.len()).skip(skip))
        .collect();

    let header = Row::new(
        visible
            .iter()
            .map(|&i| Cell::from(preview.columns[i].clone()).style(theme::accent_bold())),
    );
    let rows = preview.rows.iter().map(|row| {
        Row::new(visible.iter().map(|&i| {
            let value = row.get(i).cloned().unwrap_or_default();
            Cell::from(short(&value)).style(theme::text())
        }))
    });
    let widths = visible.iter().map(|_| Constraint::Length(COLUMN_WIDTH));

    let table = Table::new(rows, widths).header(header).column_spacing(1);
    f.render_widget(table, area);
}

/// Trim float noise so values fit a fixed column.
fn short(value: &str) -> String {
    match value.parse::<f64>() {
        Ok(v) if value.contains('.') => format!("{v:.2}"),
        _ => value.to_string(),
    }
}
