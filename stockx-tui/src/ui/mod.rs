//! Top-level UI layout: header, sidebar, active panel, status bar.

pub mod chart_panel;
pub mod fundamentals_panel;
pub mod help_panel;
pub mod overlays;
pub mod overview_panel;
pub mod sidebar;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use stockx_dashboard::{MainPanel, MainView};

use crate::app::{AppState, Overlay, Panel};
use crate::theme;

const SIDEBAR_WIDTH: u16 = 34;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[1]);

    render_header(f, rows[0], app);
    sidebar::render(f, columns[0], app);
    draw_panel(f, columns[1], app);
    status_bar::render(f, rows[2], app);

    match app.overlay {
        Overlay::Watchlist => overlays::render_watchlist(f, columns[1], &app.watchlist_input),
        Overlay::ErrorHistory => overlays::render_error_history(f, columns[1], app),
        Overlay::None => {}
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let range = app.time_range();
    let line = Line::from(vec![
        Span::styled(" STOCK.X ", theme::accent_bold()),
        Span::styled("Choose and grow high", theme::text()),
        Span::raw("   "),
        Span::styled(format!("{} [{range}]", app.range), theme::neutral()),
        Span::raw("   "),
        Span::styled(format!("source: {}", app.client_name()), theme::muted()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Draw the active panel with its border.
fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    if panel == Panel::Help {
        help_panel::render(f, inner, app);
        return;
    }

    let main = match app.view.as_ref().map(|v| &v.main) {
        None => {
            render_hint(f, inner, "Press Enter to load the dashboard.");
            return;
        }
        Some(MainView::NoSelection { message }) => {
            render_hint(f, inner, message);
            return;
        }
        Some(MainView::Selected(main)) => main.as_ref(),
    };

    match panel {
        Panel::Overview => overview_panel::render(f, inner, app, main),
        Panel::Price | Panel::MovingAverage | Panel::Volume => {
            chart_panel::render(f, inner, panel, main)
        }
        Panel::Fundamentals => fundamentals_panel::render(f, inner, app, main),
        Panel::Help => {}
    }
}

pub(crate) fn render_hint(f: &mut Frame, area: Rect, text: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(text.to_string(), theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// True when the table carries at least one row.
pub(crate) fn has_data(main: &MainPanel) -> bool {
    !main.table.canonical().is_empty()
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let r = centered_rect(60, 40, area);
        assert!(r.x >= area.x && r.right() <= area.right());
        assert!(r.y >= area.y && r.bottom() <= area.bottom());
    }

    #[test]
    fn draws_before_first_refresh() {
        let app = test_app();
        let text = screen(&app);
        assert!(text.contains("STOCK.X"));
        assert!(text.contains("Press Enter to load"));
    }

    #[test]
    fn draws_every_panel_after_refresh() {
        let mut app = test_app();
        app.watchlist_text = "AAPL, BADTICKER".into();
        app.refresh();
        for i in 0..6 {
            app.active_panel = Panel::from_index(i).unwrap();
            let text = screen(&app);
            assert!(text.contains(app.active_panel.label()), "panel {i}");
        }
    }

    #[test]
    fn no_selection_message_is_shown() {
        let mut app = test_app();
        app.toggle_cursor();
        app.refresh();
        assert!(screen(&app).contains("Please select at least one stock symbol"));
    }

    #[test]
    fn overlays_draw() {
        let mut app = test_app();
        app.open_watchlist();
        assert!(screen(&app).contains("Watchlist"));
        app.overlay = Overlay::ErrorHistory;
        assert!(screen(&app).contains("Error History"));
    }
}
