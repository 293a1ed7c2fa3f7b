//! Panel 6: keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Navigation");
    key(&mut lines, "1-6", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "PageUp / PageDown", "Scroll the active panel");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Selection");
    key(&mut lines, "j / k", "Move the symbol cursor");
    key(&mut lines, "Space", "Toggle symbol selection");
    key(&mut lines, "[ / ]", "Previous / next time range");
    key(&mut lines, "w", "Edit watchlist (comma-separated symbols)");
    key(&mut lines, "Enter / r", "Refresh the dashboard");
    lines.push(Line::from(""));

    section(&mut lines, "Actions");
    key(&mut lines, "x", &format!("Export table to {}", app.config.export_file.display()));
    key(&mut lines, "b / s", "Buy / Sell (display only)");
    key(&mut lines, "e", "Open error history");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>20}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
