//! Parrot/neon palette and the style helpers every panel draws with.
//!
//! - **Accent**: electric cyan (focus, highlights)
//! - **Positive**: neon green (gains, Buy)
//! - **Negative**: hot pink (losses, Sell, errors)
//! - **Warning**: neon orange (local warnings)
//! - **Muted**: steel blue (secondary text)

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT: Color = Color::White;

/// Trace colors, cycled per symbol.
pub const SERIES: [Color; 6] = [
    ACCENT,
    POSITIVE,
    WARNING,
    NEUTRAL,
    NEGATIVE,
    Color::Rgb(255, 255, 102),
];

pub fn series_color(i: usize) -> Color {
    SERIES[i % SERIES.len()]
}

/// Green for gains (including zero), pink for losses.
pub fn change_color(pct: f64) -> Color {
    if pct >= 0.0 {
        POSITIVE
    } else {
        NEGATIVE
    }
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_color_by_sign() {
        assert_eq!(change_color(1.2), POSITIVE);
        assert_eq!(change_color(0.0), POSITIVE);
        assert_eq!(change_color(-0.1), NEGATIVE);
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), ACCENT);
        assert_eq!(series_color(SERIES.len()), ACCENT);
    }
}
