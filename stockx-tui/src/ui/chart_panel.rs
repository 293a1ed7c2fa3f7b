//! Panels 2-4: price, moving-average, and volume line charts.

use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Chart, Dataset, GraphType};
use ratatui::Frame;

use stockx_dashboard::{ChartKind, ChartMode, ChartSpec, MainPanel};

use crate::app::Panel;
use crate::theme;
use crate::ui::render_hint;

pub fn render(f: &mut Frame, area: Rect, panel: Panel, main: &MainPanel) {
    let kind = match panel {
        Panel::Price => ChartKind::Price,
        Panel::MovingAverage => ChartKind::MovingAverage,
        _ => ChartKind::Volume,
    };

    match main.charts.iter().find(|c| c.kind == kind) {
        Some(chart) => render_chart(f, area, chart),
        None => render_hint(f, area, "No data to chart for the selected symbols and range."),
    }
}

/// Defined points of each plotted trace, x = row offset.
pub(crate) fn points(chart: &ChartSpec) -> Vec<(String, Vec<(f64, f64)>)> {
    chart
        .plotted()
        .into_iter()
        .map(|trace| {
            let data = trace
                .values
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
                .collect();
            (trace.label, data)
        })
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, chart: &ChartSpec) {
    let series = points(chart);
    let (min_y, max_y) = chart.y_bounds().unwrap_or((0.0, 1.0));
    let spread = (max_y - min_y).abs();
    let padding = if spread > 0.0 { spread * 0.05 } else { 1.0 };
    let (y_min, y_max) = match chart.mode {
        ChartMode::Stack => (0.0_f64.min(min_y), max_y + padding),
        ChartMode::Overlay => (min_y - padding, max_y + padding),
    };
    let x_max = chart.dates.len().saturating_sub(1) as f64;

    let datasets: Vec<Dataset> = series
        .iter()
        .enumerate()
        .map(|(i, (label, data))| {
            Dataset::default()
                .name(label.clone())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::series_color(i)))
                .graph_type(GraphType::Line)
                .data(data)
        })
        .collect();

    let widget = Chart::new(datasets)
        .block(
            ratatui::widgets::Block::default()
                .title(Span::styled(chart.title.clone(), theme::accent_bold())),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(chart.x_label.clone(), theme::muted()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(date_labels(&chart.dates)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(chart.y_label.clone(), theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.2}"), theme::muted()),
                    Span::styled(format!("{:.2}", (y_min + y_max) / 2.0), theme::muted()),
                    Span::styled(format!("{y_max:.2}"), theme::muted()),
                ]),
        );

    f.render_widget(widget, area);
}

fn date_labels(dates: &[NaiveDate]) -> Vec<Span<'static>> {
    let fmt = |d: &NaiveDate| Span::styled(d.format("%Y-%m-%d").to_string(), theme::muted());
    match dates {
        [] => vec![],
        [only] => vec![fmt(only)],
        [first, .., last] => vec![fmt(first), fmt(last)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockx_dashboard::Trace;

    fn chart(mode: ChartMode) -> ChartSpec {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        ChartSpec {
            kind: ChartKind::Volume,
            title: "t".into(),
            x_label: "Date".into(),
            y_label: "Volume".into(),
            mode,
            dates: vec![d(1), d(2), d(3)],
            traces: vec![
                Trace { label: "A".into(), values: vec![Some(1.0), None, Some(3.0)] },
                Trace { label: "B".into(), values: vec![Some(2.0), Some(2.0), Some(2.0)] },
            ],
        }
    }

    #[test]
    fn points_skip_undefined_values() {
        let pts = points(&chart(ChartMode::Overlay));
        assert_eq!(pts[0].1, vec![(0.0, 1.0), (2.0, 3.0)]);
        assert_eq!(pts[1].1.len(), 3);
    }

    #[test]
    fn stacked_points_are_cumulative() {
        let pts = points(&chart(ChartMode::Stack));
        assert_eq!(pts[1].1, vec![(0.0, 3.0), (1.0, 2.0), (2.0, 5.0)]);
    }

    #[test]
    fn date_labels_cover_first_and_last() {
        let s = chart(ChartMode::Overlay);
        let labels = date_labels(&s.dates);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].content, "2024-01-01");
        assert_eq!(labels[1].content, "2024-01-03");
        assert!(date_labels(&[]).is_empty());
    }
}
