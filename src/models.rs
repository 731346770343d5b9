//! Billing dashboard data types
//!
//! The backend payload is decoded into [`RawBillingDashboard`], where every number is optional
//! and every list is an arbitrary JSON value. The controller normalizes it into
//! [`BillingDashboard`] before anything is rendered.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Dashboard snapshot exactly as the backend sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBillingDashboard {
    #[serde(default)]
    pub total_processed: Option<f64>,
    #[serde(default)]
    pub success_count: Option<f64>,
    #[serde(default)]
    pub error_count: Option<f64>,
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub average_processing_time_ms: Option<f64>,
    #[serde(default)]
    pub query_from: Option<String>,
    #[serde(default)]
    pub query_to: Option<String>,
    #[serde(default)]
    pub recent_errors: Value,
    #[serde(default)]
    pub series_stats: Value,
}

/// Normalized dashboard snapshot, safe to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDashboard {
    pub total_processed: u64,
    pub success_count: u64,
    pub error_count: u64,
    /// Percentage in the 0..=100 range as computed by the backend.
    pub success_rate: f64,
    pub average_processing_time_ms: f64,
    pub query_from: Option<String>,
    pub query_to: Option<String>,
    pub recent_errors: Vec<InvoiceDetail>,
    pub series_stats: Vec<SeriesStatsPoint>,
}

/// One failed invoice. Every field may be missing, and a field of the wrong type reads as
/// missing without discarding the rest of the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDetail {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, rename = "fecha", deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(default, rename = "serie", deserialize_with = "lenient")]
    pub series: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub folio: Option<i64>,
    #[serde(default, rename = "rfcReceptor", deserialize_with = "lenient")]
    pub receiver_rfc: Option<String>,
    #[serde(default, rename = "xmlGenerado", deserialize_with = "lenient")]
    pub xml_generated: Option<bool>,
    #[serde(default, rename = "pdfGenerado", deserialize_with = "lenient")]
    pub pdf_generated: Option<bool>,
    #[serde(default, rename = "mensaje", deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, rename = "tiempoProceso", deserialize_with = "lenient")]
    pub processing_time_ms: Option<f64>,
}

/// Success/error tally for a single billing series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStatsPoint {
    #[serde(default, rename = "serie", deserialize_with = "null_as_default")]
    pub series: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub success: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub error: u64,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total: u64,
}

impl SeriesStatsPoint {
    /// Total used for scaling; falls back to success + error when the backend sent no total.
    pub fn effective_total(&self) -> u64 {
        if self.total > 0 {
            self.total
        } else {
            self.success.saturating_add(self.error)
        }
    }
}

/// Converts an optional JSON number into a non-negative count.
pub fn to_count(value: Option<f64>) -> u64 {
    match value {
        Some(n) if n.is_finite() && n > 0.0 => n as u64,
        _ => 0,
    }
}

/// Any value that does not decode as `T` reads as `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

fn count_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(to_count(Value::deserialize(deserializer)?.as_f64()))
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_dashboard_accepts_partial_payload() {
        let raw: RawBillingDashboard = serde_json::from_value(json!({
            "totalProcessed": 10,
            "successRate": null,
            "recentErrors": "not a list"
        }))
        .unwrap();

        assert_eq!(raw.total_processed, Some(10.0));
        assert_eq!(raw.success_count, None);
        assert_eq!(raw.success_rate, None);
        assert_eq!(raw.recent_errors, json!("not a list"));
        assert_eq!(raw.series_stats, Value::Null);
    }

    #[test]
    fn invoice_detail_maps_wire_names() {
        let detail: InvoiceDetail = serde_json::from_value(json!({
            "id": 42,
            "fecha": "2026-03-04T05:06:07",
            "serie": "FA",
            "folio": 1001,
            "rfcReceptor": "XAXX010101000",
            "xmlGenerado": true,
            "pdfGenerado": null,
            "mensaje": "Timbrado rechazado",
            "tiempoProceso": 350.5
        }))
        .unwrap();

        assert_eq!(detail.id.as_deref(), Some("42"));
        assert_eq!(detail.series.as_deref(), Some("FA"));
        assert_eq!(detail.folio, Some(1001));
        assert_eq!(detail.receiver_rfc.as_deref(), Some("XAXX010101000"));
        assert_eq!(detail.xml_generated, Some(true));
        assert_eq!(detail.pdf_generated, None);
        assert_eq!(detail.processing_time_ms, Some(350.5));
    }

    #[test]
    fn invoice_detail_keeps_record_when_one_field_is_mistyped() {
        let detail: InvoiceDetail = serde_json::from_value(json!({
            "id": "a2",
            "serie": "FA",
            "folio": "not a number",
            "xmlGenerado": "yes",
            "mensaje": "Timbrado rechazado"
        }))
        .unwrap();

        assert_eq!(detail.id.as_deref(), Some("a2"));
        assert_eq!(detail.series.as_deref(), Some("FA"));
        assert_eq!(detail.folio, None);
        assert_eq!(detail.xml_generated, None);
        assert_eq!(detail.message.as_deref(), Some("Timbrado rechazado"));
    }

    #[test]
    fn series_point_ignores_mistyped_counts() {
        let point: SeriesStatsPoint = serde_json::from_value(json!({
            "serie": 7,
            "success": "many",
            "error": 2
        }))
        .unwrap();

        assert_eq!(point.series, "");
        assert_eq!(point.success, 0);
        assert_eq!(point.error, 2);
    }

    #[test]
    fn invoice_detail_tolerates_empty_object() {
        let detail: InvoiceDetail = serde_json::from_value(json!({})).unwrap();
        assert_eq!(detail, InvoiceDetail::default());
    }

    #[test]
    fn series_point_treats_null_counts_as_zero() {
        let point: SeriesStatsPoint = serde_json::from_value(json!({
            "serie": null,
            "success": 3,
            "error": null
        }))
        .unwrap();

        assert_eq!(point.series, "");
        assert_eq!(point.success, 3);
        assert_eq!(point.error, 0);
        assert_eq!(point.total, 0);
        assert_eq!(point.effective_total(), 3);
    }

    #[test]
    fn to_count_rejects_negative_and_non_finite() {
        assert_eq!(to_count(Some(-4.0)), 0);
        assert_eq!(to_count(Some(f64::NAN)), 0);
        assert_eq!(to_count(None), 0);
        assert_eq!(to_count(Some(7.9)), 7);
    }
}
