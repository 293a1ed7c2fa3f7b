//! Keyboard input dispatch: overlays, then global keys, then panel keys.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use stockx_dashboard::TradeAction;

use crate::app::{AppState, Overlay, Panel};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Watchlist => {
            handle_watchlist_overlay(app, key);
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys.
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char(c @ '1'..='6') => {
            if let Some(panel) = Panel::from_index(c as usize - '1' as usize) {
                app.active_panel = panel;
                app.scroll = 0;
            }
        }
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.active_panel = app.active_panel.prev();
        }
        KeyCode::Tab => app.active_panel = app.active_panel.next(),
        KeyCode::BackTab => app.active_panel = app.active_panel.prev(),

        // Sidebar
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(true),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(false),
        KeyCode::Char(' ') => app.toggle_cursor(),
        KeyCode::Char(']') => app.cycle_range(true),
        KeyCode::Char('[') => app.cycle_range(false),
        KeyCode::Char('w') => app.open_watchlist(),
        KeyCode::Enter | KeyCode::Char('r') => app.refresh(),

        // Actions
        KeyCode::Char('x') => app.export(),
        KeyCode::Char('b') => app.trade_action(TradeAction::Buy),
        KeyCode::Char('s') => app.trade_action(TradeAction::Sell),
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
        }

        // Main area scroll
        KeyCode::PageDown => app.scroll = app.scroll.saturating_add(5),
        KeyCode::PageUp => app.scroll = app.scroll.saturating_sub(5),
        _ => {}
    }
}

fn handle_watchlist_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.watchlist_input.clear();
            app.overlay = Overlay::None;
        }
        KeyCode::Enter => app.commit_watchlist(),
        KeyCode::Backspace => {
            app.watchlist_input.pop();
        }
        KeyCode::Char(c) => app.watchlist_input.push(c),
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}
