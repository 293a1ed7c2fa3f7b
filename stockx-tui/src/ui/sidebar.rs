//! Left sidebar: indices, range presets, symbol catalog, watchlist.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use stockx_core::RangePreset;
use stockx_dashboard::{IndexPanel, QuoteView, WatchEntry};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" Market ")
        .title_style(theme::panel_title(false));

    let mut lines: Vec<Line> = Vec::new();

    heading(&mut lines, "Indices");
    match app.view.as_ref().map(|v| &v.indices) {
        Some(IndexPanel::Quotes(quotes)) => {
            for q in quotes {
                lines.push(quote_line(q));
            }
        }
        Some(IndexPanel::Unavailable { notice, .. }) => {
            lines.push(Line::from(Span::styled(format!(" {notice}"), theme::warning())));
        }
        None => lines.push(Line::from(Span::styled(" -", theme::muted()))),
    }
    lines.push(Line::from(""));

    heading(&mut lines, "Range  [ / ]");
    let mut spans = vec![Span::raw(" ")];
    for preset in RangePreset::ALL {
        let style = if preset == app.range {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::muted()
        };
        spans.push(Span::styled(preset.label(), style));
        spans.push(Span::raw(" "));
    }
    lines.push(Line::from(spans));
    lines.push(Line::from(""));

    heading(&mut lines, "Symbols  Space");
    for (i, symbol) in app.config.catalog.iter().enumerate() {
        let at_cursor = i == app.catalog_cursor;
        let mark = if app.selected.contains(symbol) { "[x]" } else { "[ ]" };
        let style = match (at_cursor, app.selected.contains(symbol)) {
            (true, _) => theme::accent_bold(),
            (false, true) => theme::text(),
            (false, false) => theme::muted(),
        };
        let pointer = if at_cursor { ">" } else { " " };
        lines.push(Line::from(Span::styled(format!("{pointer}{mark} {symbol}"), style)));
    }
    lines.push(Line::from(""));

    heading(&mut lines, "Watchlist  w");
    match app.view.as_ref().map(|v| v.watchlist.as_slice()) {
        Some(entries) if !entries.is_empty() => {
            for entry in entries {
                match entry {
                    WatchEntry::Quote(q) => lines.push(quote_line(q)),
                    WatchEntry::Warning { message, .. } => {
                        let text = format!(" {message}");
                        lines.push(Line::from(Span::styled(text, theme::warning())));
                    }
                }
            }
        }
        _ => lines.push(Line::from(Span::styled(" (empty)", theme::muted()))),
    }

    let para = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn heading(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn quote_line(q: &QuoteView) -> Line<'static> {
    let arrow = if q.is_up() { "▲" } else { "▼" };
    Line::from(vec![
        Span::styled(format!(" {:<10}", q.label), theme::text()),
        Span::styled(format!("{} ", q.price), theme::text()),
        Span::styled(
            format!("{arrow}{}", q.change),
            Style::default().fg(theme::change_color(q.quote.pct_change)),
        ),
    ])
}
