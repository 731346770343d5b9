//! Raw payload normalization

use crate::models::{BillingDashboard, RawBillingDashboard, to_count};
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Fill in defaults for everything the backend left out.
///
/// Missing or null numbers become zero, list fields that are not JSON arrays become empty,
/// and list items that cannot be decoded are skipped.
pub fn normalize_dashboard(raw: RawBillingDashboard) -> BillingDashboard {
    BillingDashboard {
        total_processed: to_count(raw.total_processed),
        success_count: to_count(raw.success_count),
        error_count: to_count(raw.error_count),
        success_rate: finite_or_zero(raw.success_rate),
        average_processing_time_ms: finite_or_zero(raw.average_processing_time_ms),
        query_from: raw.query_from,
        query_to: raw.query_to,
        recent_errors: list_or_empty(raw.recent_errors, "recentErrors"),
        series_stats: list_or_empty(raw.series_stats, "seriesStats"),
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

fn list_or_empty<T: DeserializeOwned>(value: Value, field: &str) -> Vec<T> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!("Skipping malformed {} entry: {}", field, e);
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            debug!("Expected a list for {}, got {}", field, other);
            Vec::new()
        }
    }
}
