//! Per-series bar chart
//!
//! One group per billing series with a success bar and an error bar, scaled to the largest
//! series total of the dataset.

use super::super::state::DashboardState;
use crate::controller::SeriesKind;
use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Paragraph};

pub fn render_series_chart(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let block = Block::default()
        .title("SERIES")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan));

    let series = state
        .view()
        .dashboard
        .as_ref()
        .map(|d| d.series_stats.as_slice())
        .unwrap_or_default();

    if series.is_empty() {
        let empty = Paragraph::new("No series data").block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(3)
        .bar_gap(1)
        .group_gap(3)
        .max(100);

    for point in series {
        let success = state
            .controller
            .series_bar_height(point, SeriesKind::Success);
        let error = state.controller.series_bar_height(point, SeriesKind::Error);
        let bars = [
            Bar::default()
                .value(success.round() as u64)
                .text_value(point.success.to_string())
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(error.round() as u64)
                .text_value(point.error.to_string())
                .style(Style::default().fg(Color::Red)),
        ];
        let label = if point.series.is_empty() {
            "-".to_string()
        } else {
            point.series.clone()
        };
        chart = chart.data(BarGroup::default().label(Line::from(label)).bars(&bars));
    }

    f.render_widget(chart, area);
}
