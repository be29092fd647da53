//! Error handling for the poller module

use std::time::Duration;
use thiserror::Error;

/// Rejected registration parameters. Raised synchronously by `register`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollerError {
    #[error("Invalid config for source '{id}': {reason}")]
    InvalidConfig { id: String, reason: String },
}

impl PollerError {
    pub(crate) fn invalid(id: &str, reason: impl Into<String>) -> Self {
        PollerError::InvalidConfig {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// A failed fetch attempt. Contained within the owning source and kept in its
/// snapshot, so it has to be cheap to clone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure (DNS, connect, reset...)
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP error with status {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not valid JSON.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The fetch did not settle within the configured timeout.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl FetchError {
    /// HTTP status of the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_reports_millis() {
        let err = FetchError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "Request timed out after 10000ms");
    }

    #[test]
    fn test_status_only_for_http_failures() {
        let http = FetchError::Status {
            status: 503,
            message: "busy".to_string(),
        };
        assert_eq!(http.status(), Some(503));
        assert_eq!(FetchError::Network("reset".to_string()).status(), None);
    }
}
