use crate::logging::LogLevel;
use crate::monitor::error::MonitorError;

/// Maps client failures to the level they are reported at.
#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_fetch_error(&self, error: &MonitorError) -> LogLevel {
        match error {
            // Throttled, the next tick will try again
            MonitorError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            MonitorError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Misconfiguration: wrong base URL or missing credentials
            MonitorError::Http { status, .. } if *status == 401 => LogLevel::Error,
            MonitorError::Http { status, .. } if *status == 403 => LogLevel::Error,
            MonitorError::Http { status, .. } if *status == 404 => LogLevel::Error,

            // Backend contract broken
            MonitorError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }

    /// Short human description of the failure class, for the activity log.
    pub fn describe(&self, error: &MonitorError) -> &'static str {
        match error {
            MonitorError::Reqwest(e) if e.is_timeout() => "request timed out",
            MonitorError::Reqwest(e) if e.is_connect() => "backend unreachable",
            MonitorError::Reqwest(_) => "network failure",
            MonitorError::Http { status, .. } if (500..=599).contains(status) => "server error",
            MonitorError::Http { .. } => "request rejected",
            MonitorError::Decode(_) => "malformed response",
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> MonitorError {
        MonitorError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn classifies_http_statuses() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_fetch_error(&http(429)), LogLevel::Debug);
        assert_eq!(classifier.classify_fetch_error(&http(503)), LogLevel::Warn);
        assert_eq!(classifier.classify_fetch_error(&http(401)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(404)), LogLevel::Error);
        assert_eq!(classifier.classify_fetch_error(&http(418)), LogLevel::Warn);
    }

    #[test]
    fn decode_failures_are_errors() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = MonitorError::Decode(decode);
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_fetch_error(&error), LogLevel::Error);
        assert_eq!(classifier.describe(&error), "malformed response");
        assert_eq!(classifier.describe(&http(500)), "server error");
    }
}
