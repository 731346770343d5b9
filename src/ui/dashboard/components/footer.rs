//! Dashboard footer component
//!
//! Renders key hints for the current input mode

use super::super::state::{DashboardState, InputMode};
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let footer_text = match state.input_mode {
        InputMode::Normal => "[D] Search by date | [C] Clear filter | [R] Refresh | [Q] Quit",
        InputMode::EditingDate => "Type YYYY-MM-DD | [Enter] Search | [Esc] Cancel",
    };

    let footer = Paragraph::new(footer_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_type(BorderType::Thick),
        );
    f.render_widget(footer, area);
}
