//! Dashboard main renderer

use super::components::{errors, footer, header, info_panel, logs, series};
use super::state::DashboardState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;

pub fn render_dashboard(f: &mut Frame, state: &DashboardState) {
    if state.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            f.area(),
        );
    }

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Percentage(30),
            Constraint::Length(2),
        ])
        .margin(1)
        .split(f.area());

    header::render_header(f, main_chunks[0], state);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(main_chunks[1]);

    let data_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(content_chunks[1]);

    info_panel::render_info_panel(f, content_chunks[0], state);
    series::render_series_chart(f, data_chunks[0], state);
    errors::render_errors_table(f, data_chunks[1], state);
    logs::render_logs_panel(f, main_chunks[2], state);
    footer::render_footer(f, main_chunks[3], state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DashboardController;
    use crate::environment::Environment;
    use crate::events::EventSender;
    use crate::models::RawBillingDashboard;
    use crate::monitor::MockBillingMonitor;
    use chrono::NaiveDate;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn renders_a_historical_dataset() {
        let mut monitor = MockBillingMonitor::new();
        monitor.expect_get_dashboard_by_date().returning(|_| {
            Ok(RawBillingDashboard {
                total_processed: Some(10.0),
                success_count: Some(8.0),
                error_count: Some(2.0),
                success_rate: Some(80.0),
                recent_errors: json!([{ "serie": "FA", "folio": 77, "mensaje": "RFC inválido" }]),
                series_stats: json!([{ "serie": "FA", "success": 8, "error": 2, "total": 10 }]),
                ..Default::default()
            })
        });
        let (sender, _receiver) = mpsc::channel(10);
        let mut controller = DashboardController::with_today(
            Arc::new(monitor),
            EventSender::new(sender),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        );
        controller.set_selected_date("2026-10-01");
        controller.search_by_date().unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let mut state = DashboardState::new(Environment::Local, controller, true);
        state.update();

        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|f| render_dashboard(f, &state)).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("HISTORICAL 2026-10-01"));
        assert!(text.contains("SUMMARY"));
        assert!(text.contains("RECENT ERRORS (1)"));
        assert!(text.contains("FA-77"));
    }
}
