use crate::environment::Environment;
use crate::models::RawBillingDashboard;
use crate::monitor::error::MonitorError;

pub(crate) mod client;
pub use client::BillingMonitorClient;
pub mod error;
pub mod polling;
pub use polling::{DashboardPoller, PollUpdate};

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait BillingMonitor: Send + Sync {
    fn environment(&self) -> &Environment;

    /// Fetch the aggregate dashboard for the current window.
    async fn get_dashboard(&self) -> Result<RawBillingDashboard, MonitorError>;

    /// Fetch the aggregate dashboard for a single day (`YYYY-MM-DD`).
    async fn get_dashboard_by_date(
        &self,
        fecha: &str,
    ) -> Result<RawBillingDashboard, MonitorError>;
}
