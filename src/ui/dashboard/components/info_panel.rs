//! Dashboard summary panel component
//!
//! Renders the headline counts of the current dataset, the date filter and any error text

use crate::environment::Environment;

use super::super::state::{DashboardState, InputMode};
use super::super::utils::{format_date_time, success_rate_color};
use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

fn labeled(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

/// Render the summary panel.
pub fn render_info_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let view = state.view();
    let mut info_lines = Vec::new();

    let env_color = match state.environment {
        Environment::Local => Color::Green,
        Environment::Custom { .. } => Color::Yellow,
    };
    info_lines.push(labeled("Env", state.environment.api_url(), env_color));

    match &view.dashboard {
        Some(dashboard) => {
            let success = state.controller.success_percentage();
            let error = state.controller.error_percentage();
            info_lines.push(labeled(
                "Processed",
                dashboard.total_processed.to_string(),
                Color::White,
            ));
            info_lines.push(labeled(
                "Success",
                format!("{} ({:.1}%)", dashboard.success_count, success),
                success_rate_color(success),
            ));
            info_lines.push(labeled(
                "Errors",
                format!("{} ({:.1}%)", dashboard.error_count, error),
                if dashboard.error_count > 0 {
                    Color::LightRed
                } else {
                    Color::Green
                },
            ));
            info_lines.push(labeled(
                "Avg time",
                format!("{:.0} ms", dashboard.average_processing_time_ms),
                Color::LightCyan,
            ));
            info_lines.push(labeled(
                "From",
                format_date_time(dashboard.query_from.as_deref()),
                Color::LightBlue,
            ));
            info_lines.push(labeled(
                "To",
                format_date_time(dashboard.query_to.as_deref()),
                Color::LightBlue,
            ));
        }
        None => info_lines.push(Line::from(Span::styled(
            if view.loading {
                "Loading dashboard..."
            } else {
                "No data"
            },
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let last_updated = view
        .last_updated
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    info_lines.push(labeled("Updated", last_updated, Color::LightGreen));

    info_lines.push(Line::from(""));
    let date_line = match state.input_mode {
        InputMode::EditingDate => Line::from(vec![
            Span::styled("Date: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}_", state.date_input),
                Style::default()
                    .fg(Color::LightYellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (max {})", view.max_selectable_date_string()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Normal => match view.queried_date_string() {
            Some(date) => labeled("Date", date, Color::Magenta),
            None => labeled("Date", "today (live)".to_string(), Color::DarkGray),
        },
    };
    info_lines.push(date_line);

    if let Some(error) = &view.error {
        info_lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let info_block = Block::default()
        .title("SUMMARY")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    let info_paragraph = Paragraph::new(info_lines)
        .block(info_block)
        .wrap(Wrap { trim: true });
    f.render_widget(info_paragraph, area);
}
