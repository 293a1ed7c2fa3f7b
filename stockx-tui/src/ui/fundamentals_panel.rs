//! Panel 5: company profile and metric groups per selected symbol.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use stockx_dashboard::{FundamentalsEntry, FundamentalsPanel, MainPanel};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState, main: &MainPanel) {
    let mut lines: Vec<Line> = Vec::new();

    for entry in &main.fundamentals {
        match entry {
            FundamentalsEntry::Panel(panel) => push_panel(&mut lines, panel),
            FundamentalsEntry::Warning { message, .. } => {
                lines.push(Line::from(Span::styled(message.clone(), theme::warning())));
            }
        }
        lines.push(Line::from(""));
    }

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((app.scroll, 0));
    f.render_widget(para, area);
}

fn push_panel(lines: &mut Vec<Line<'_>>, panel: &FundamentalsPanel) {
    lines.push(Line::from(vec![
        Span::styled(format!("{} ", panel.title), theme::accent_bold()),
        Span::styled(format!("({})", panel.symbol), theme::muted()),
    ]));
    lines.push(Line::from(Span::styled("About", theme::neutral())));
    lines.push(Line::from(Span::styled(panel.about.clone(), theme::text())));

    let groups = [
        ("Key Metrics", &panel.key_metrics),
        ("More Insights", &panel.more_insights),
    ];
    for (heading, metrics) in groups {
        lines.push(Line::from(Span::styled(heading, theme::neutral())));
        for m in metrics {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<18}", m.label), theme::muted()),
                Span::styled(m.value.clone(), theme::text()),
            ]));
        }
    }
}
