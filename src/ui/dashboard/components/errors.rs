//! Recent errors table

use super::super::state::DashboardState;
use super::super::utils::{format_time, truncate_message};
use crate::consts::cli_consts::MAX_MESSAGE_LEN;
use crate::models::InvoiceDetail;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn invoice_row(invoice: &InvoiceDetail) -> Row<'static> {
    let document = match (&invoice.series, invoice.folio) {
        (Some(series), Some(folio)) => format!("{}-{}", series, folio),
        (Some(series), None) => series.clone(),
        (None, Some(folio)) => folio.to_string(),
        (None, None) => "-".to_string(),
    };
    Row::new(vec![
        Cell::from(format_time(invoice.date.as_deref())),
        Cell::from(document),
        Cell::from(invoice.receiver_rfc.clone().unwrap_or_else(|| "-".to_string())),
        Cell::from(format!(
            "{}/{}",
            flag(invoice.xml_generated),
            flag(invoice.pdf_generated)
        )),
        Cell::from(truncate_message(invoice.message.as_deref(), MAX_MESSAGE_LEN))
            .style(Style::default().fg(Color::LightRed)),
    ])
}

pub fn render_errors_table(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let rows: Vec<Row> = state
        .view()
        .dashboard
        .as_ref()
        .map(|d| d.recent_errors.iter().map(invoice_row).collect())
        .unwrap_or_default();

    let title = format!("RECENT ERRORS ({})", rows.len());
    let header = Row::new(vec!["Time", "Document", "RFC", "XML/PDF", "Message"]).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(7),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_render_missing_values_as_dash() {
        assert_eq!(flag(Some(true)), "yes");
        assert_eq!(flag(Some(false)), "no");
        assert_eq!(flag(None), "-");
    }
}
