//! Billing Monitor Client
//!
//! A thin HTTP client for the billing backend's dashboard endpoints.

use crate::consts::cli_consts::network;
use crate::environment::Environment;
use crate::models::RawBillingDashboard;
use crate::monitor::BillingMonitor;
use crate::monitor::error::MonitorError;
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("billing-monitor/", env!("CARGO_PKG_VERSION"));

const DASHBOARD_ENDPOINT: &str = "BillingMonitor/dashboard";
const DASHBOARD_BY_DATE_ENDPOINT: &str = "BillingMonitor/dashboard/by-date";

#[derive(Debug, Clone)]
pub struct BillingMonitorClient {
    client: Client,
    environment: Environment,
}

impl BillingMonitorClient {
    pub fn new(environment: Environment) -> Self {
        Self {
            client: ClientBuilder::new()
                .connect_timeout(network::connect_timeout())
                .timeout(network::request_timeout())
                .build()
                .expect("Failed to create HTTP client"),
            environment,
        }
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.environment.api_url().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, MonitorError> {
        if !response.status().is_success() {
            return Err(MonitorError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, MonitorError> {
        let url = self.build_url(endpoint);
        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = Self::handle_response_status(response).await?;
        let response_bytes = response.bytes().await?;
        serde_json::from_slice(&response_bytes).map_err(MonitorError::Decode)
    }
}

#[async_trait::async_trait]
impl BillingMonitor for BillingMonitorClient {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn get_dashboard(&self) -> Result<RawBillingDashboard, MonitorError> {
        self.get_request(DASHBOARD_ENDPOINT).await
    }

    async fn get_dashboard_by_date(
        &self,
        fecha: &str,
    ) -> Result<RawBillingDashboard, MonitorError> {
        let endpoint = format!(
            "{}?fecha={}",
            DASHBOARD_BY_DATE_ENDPOINT,
            urlencoding::encode(fecha)
        );
        self.get_request(&endpoint).await
    }
}
