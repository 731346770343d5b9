//! Error handling for the billing monitor client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The response body was not a dashboard document.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl MonitorError {
    pub async fn from_response(response: reqwest::Response) -> MonitorError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        MonitorError::Http { status, message }
    }

    /// HTTP status of the failure, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            MonitorError::Http { status, .. } => Some(*status),
            MonitorError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            MonitorError::Decode(_) => None,
        }
    }
}
