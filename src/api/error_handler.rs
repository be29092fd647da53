//! Centralized error classification

use crate::logging::LogLevel;
use crate::poller::FetchError;

/// Maps fetch failures to the log level they are reported at.
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    /// Classify error and determine appropriate log level
    pub fn classify_error(&self, error: &FetchError) -> LogLevel {
        if let Some(status) = error.status() {
            return match status {
                // Rate limiting - low priority
                429 => LogLevel::Debug,
                // Authentication errors - critical
                401 | 403 => LogLevel::Error,
                // Server errors and everything else - usually temporary
                _ => LogLevel::Warn,
            };
        }

        match error {
            // Endpoint returned something that is not JSON
            FetchError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn status(status: u16) -> FetchError {
        FetchError::Status {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn test_classify_error_levels() {
        let handler = ErrorHandler::new();
        assert_eq!(handler.classify_error(&status(429)), LogLevel::Debug);
        assert_eq!(handler.classify_error(&status(503)), LogLevel::Warn);
        assert_eq!(handler.classify_error(&status(401)), LogLevel::Error);
        assert_eq!(handler.classify_error(&status(404)), LogLevel::Warn);
        assert_eq!(
            handler.classify_error(&FetchError::Timeout(Duration::from_secs(10))),
            LogLevel::Warn
        );
        assert_eq!(
            handler.classify_error(&FetchError::Decode("eof".to_string())),
            LogLevel::Error
        );
    }
}
