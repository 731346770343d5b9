//! Dashboard header component
//!
//! Renders the title and the refresh countdown gauge

use super::super::state::DashboardState;
use crate::consts::cli_consts::polling::COUNTDOWN_SECS;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

/// Render header with title and mode gauge.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let view = state.view();
    let version = env!("CARGO_PKG_VERSION");
    let title_text = if view.is_live_mode {
        format!("BILLING MONITOR v{} | LIVE", version)
    } else {
        format!(
            "BILLING MONITOR v{} | HISTORICAL {}",
            version,
            view.queried_date_string().unwrap_or_default()
        )
    };

    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let (progress_text, gauge_color, progress_percent) = if view.loading {
        // Indeterminate progress, loops every 20 ticks
        let progress = ((state.tick % 20) as f64 / 20.0 * 100.0) as u16;
        ("LOADING - Fetching dashboard".to_string(), Color::LightYellow, progress)
    } else if view.is_live_mode {
        let remaining = view.countdown.min(COUNTDOWN_SECS);
        let elapsed = COUNTDOWN_SECS - remaining;
        let progress = (elapsed as f64 / COUNTDOWN_SECS as f64 * 100.0) as u16;
        (
            format!("LIVE - Next refresh in {}s", remaining),
            Color::LightBlue,
            progress.min(100),
        )
    } else {
        (
            "HISTORICAL - Polling paused, [C] returns to live".to_string(),
            Color::Magenta,
            100,
        )
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .gauge_style(
            Style::default()
                .fg(gauge_color)
                .add_modifier(Modifier::BOLD),
        )
        .percent(progress_percent)
        .label(progress_text);

    f.render_widget(gauge, header_chunks[1]);
}
