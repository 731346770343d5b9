//! One-shot dashboard fetch for the `snapshot` command.

use crate::consts::cli_consts::{FETCH_FAILED_MESSAGE, MAX_MESSAGE_LEN};
use crate::controller::{
    DATE_FORMAT, DateValidationError, error_percentage_of, normalize_dashboard,
    success_percentage_of, validate_query_date,
};
use crate::models::BillingDashboard;
use crate::monitor::BillingMonitor;
use crate::monitor::error::MonitorError;
use crate::ui::dashboard::utils::{format_date_time, format_time, truncate_message};
use chrono::NaiveDate;
use std::fmt::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{0}")]
    InvalidDate(#[from] DateValidationError),

    #[error("{}", FETCH_FAILED_MESSAGE)]
    Fetch(#[from] MonitorError),
}

/// Fetch and normalize one dashboard: the current one, or a single past day.
pub async fn fetch_snapshot(
    monitor: &dyn BillingMonitor,
    date: Option<&str>,
    today: NaiveDate,
) -> Result<BillingDashboard, SnapshotError> {
    let raw = match date {
        Some(date) => {
            let date = validate_query_date(date, today)?;
            let fecha = date.format(DATE_FORMAT).to_string();
            monitor.get_dashboard_by_date(&fecha).await?
        }
        None => monitor.get_dashboard().await?,
    };
    Ok(normalize_dashboard(raw))
}

/// Plain-text summary for the console.
pub fn render_summary(dashboard: &BillingDashboard) -> String {
    let success = success_percentage_of(Some(dashboard));
    let error = error_percentage_of(Some(dashboard));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Window:     {} - {}",
        format_date_time(dashboard.query_from.as_deref()),
        format_date_time(dashboard.query_to.as_deref())
    );
    let _ = writeln!(out, "Processed:  {}", dashboard.total_processed);
    let _ = writeln!(
        out,
        "Success:    {} ({:.1}%)",
        dashboard.success_count, success
    );
    let _ = writeln!(out, "Errors:     {} ({:.1}%)", dashboard.error_count, error);
    let _ = writeln!(
        out,
        "Avg time:   {:.0} ms",
        dashboard.average_processing_time_ms
    );

    if !dashboard.series_stats.is_empty() {
        let _ = writeln!(out, "Series:");
        for point in &dashboard.series_stats {
            let _ = writeln!(
                out,
                "  {:<8} ok {:>6}  err {:>6}  total {:>6}",
                point.series,
                point.success,
                point.error,
                point.effective_total()
            );
        }
    }

    if !dashboard.recent_errors.is_empty() {
        let _ = writeln!(out, "Recent errors:");
        for invoice in &dashboard.recent_errors {
            let _ = writeln!(
                out,
                "  {} {}-{} {}",
                format_time(invoice.date.as_deref()),
                invoice.series.as_deref().unwrap_or("-"),
                invoice
                    .folio
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                truncate_message(invoice.message.as_deref(), MAX_MESSAGE_LEN)
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawBillingDashboard;
    use crate::monitor::MockBillingMonitor;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[tokio::test]
    async fn current_snapshot_is_normalized() {
        let mut monitor = MockBillingMonitor::new();
        monitor.expect_get_dashboard().times(1).returning(|| {
            Ok(RawBillingDashboard {
                total_processed: Some(4.0),
                success_count: Some(3.0),
                error_count: Some(1.0),
                success_rate: Some(75.0),
                recent_errors: json!("not a list"),
                ..Default::default()
            })
        });

        let dashboard = fetch_snapshot(&monitor, None, today()).await.unwrap();
        assert_eq!(dashboard.total_processed, 4);
        assert!(dashboard.recent_errors.is_empty());

        let summary = render_summary(&dashboard);
        assert!(summary.contains("Processed:  4"));
        assert!(summary.contains("Success:    3 (75.0%)"));
        assert!(summary.contains("Errors:     1 (25.0%)"));
    }

    #[tokio::test]
    async fn dated_snapshot_queries_that_day() {
        let mut monitor = MockBillingMonitor::new();
        monitor
            .expect_get_dashboard_by_date()
            .withf(|fecha| fecha.to_string() == "2026-10-17")
            .times(1)
            .returning(|_| Ok(RawBillingDashboard::default()));

        let dashboard = fetch_snapshot(&monitor, Some(" 2026-10-17 "), today())
            .await
            .unwrap();
        assert_eq!(dashboard.total_processed, 0);
    }

    #[tokio::test]
    async fn invalid_dates_never_reach_the_backend() {
        let mut monitor = MockBillingMonitor::new();
        monitor.expect_get_dashboard_by_date().never();

        let err = fetch_snapshot(&monitor, Some("2026-13-01"), today())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::InvalidDate(DateValidationError::Malformed)
        ));

        let err = fetch_snapshot(&monitor, Some("2026-10-19"), today())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::InvalidDate(DateValidationError::Future)
        ));
    }

    #[tokio::test]
    async fn fetch_failures_use_the_generic_message() {
        let mut monitor = MockBillingMonitor::new();
        monitor.expect_get_dashboard().returning(|| {
            Err(MonitorError::Http {
                status: 500,
                message: "NullReferenceException".to_string(),
            })
        });

        let err = fetch_snapshot(&monitor, None, today()).await.unwrap_err();
        assert_eq!(err.to_string(), FETCH_FAILED_MESSAGE);
    }
}
