//! Dashboard utility functions
//!
//! Formatting and color helpers shared by the dashboard components and the snapshot command.

use crate::events::Source;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use ratatui::prelude::Color;

/// Parse a backend timestamp into local time.
///
/// Timestamps with an offset are converted; timestamps without one are taken as local time.
pub fn parse_timestamp(iso: &str) -> Option<DateTime<Local>> {
    let iso = iso.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(iso) {
        return Some(with_offset.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(iso, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// `HH:MM:SS`, or `-` when missing or unparseable.
pub fn format_time(iso: Option<&str>) -> String {
    iso.and_then(parse_timestamp)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `DD/MM/YYYY, HH:MM:SS`, or `-` when missing or unparseable.
pub fn format_date_time(iso: Option<&str>) -> String {
    iso.and_then(parse_timestamp)
        .map(|t| t.format("%d/%m/%Y, %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// At most `max_len` characters followed by `...` when cut. `-` when the message is missing
/// or empty.
pub fn truncate_message(message: Option<&str>, max_len: usize) -> String {
    let Some(message) = message.filter(|m| !m.is_empty()) else {
        return "-".to_string();
    };
    match message.char_indices().nth(max_len) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // "YYYY-MM-DD HH:MM:SS" -> "MM-DD HH:MM"
    let mut parts = timestamp.split(' ');
    if let (Some(date_part), Some(time_part)) = (parts.next(), parts.next()) {
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    timestamp.to_string()
}

pub fn get_source_color(source: &Source) -> Color {
    match source {
        Source::LivePoller => Color::Cyan,
        Source::HistoricalQuery => Color::Magenta,
        Source::Dashboard => Color::Yellow,
        Source::Diagnostics => Color::Gray,
    }
}

pub fn success_rate_color(rate: f64) -> Color {
    if rate >= 95.0 {
        Color::Green
    } else if rate >= 80.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}
