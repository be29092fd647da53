//! Error handling for the api module

use crate::poller::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The response body was not valid JSON.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http {
            status,
            message: error_message(&body),
        }
    }
}

/// The API reports failures as `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .or_else(|| value.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

impl From<ApiError> for FetchError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Decode(e) => FetchError::Decode(e.to_string()),
            ApiError::Reqwest(e) if e.is_decode() => FetchError::Decode(e.to_string()),
            ApiError::Reqwest(e) => FetchError::Network(e.to_string()),
            ApiError::Http { status, message } => FetchError::Status { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_error_field() {
        assert_eq!(
            error_message(r#"{"error": "Invalid parameters"}"#),
            "Invalid parameters"
        );
        assert_eq!(
            error_message(r#"{"status": "error", "message": "Scheduler not available"}"#),
            "Scheduler not available"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_http_error_maps_to_status_failure() {
        let fetch_error: FetchError = ApiError::Http {
            status: 429,
            message: "rate limited".to_string(),
        }
        .into();
        assert_eq!(fetch_error.status(), Some(429));
    }

    #[test]
    fn test_decode_error_maps_to_decode_failure() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let fetch_error: FetchError = ApiError::from(parse_error).into();
        assert!(matches!(fetch_error, FetchError::Decode(_)));
    }
}
