//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Origin;
use crate::poller::SourceState;
use chrono::{DateTime, Local};
use ratatui::prelude::Color;

/// Get a ratatui color for the origin of an event
pub fn get_origin_color(origin: &Origin) -> Color {
    match origin {
        Origin::Source(_) => Color::Cyan,
        Origin::Session => Color::Yellow,
    }
}

/// Get a ratatui color for the lifecycle state of a source
pub fn get_state_color(state: SourceState) -> Color {
    match state {
        SourceState::Idle => Color::DarkGray,
        SourceState::Fetching => Color::LightBlue,
        SourceState::Settled => Color::LightGreen,
        SourceState::Failed => Color::LightRed,
    }
}

/// Format compact timestamp with date and time from full timestamp
pub fn format_compact_timestamp(timestamp: &str) -> String {
    // Extract from "YYYY-MM-DD HH:MM:SS" format
    if let Some((date_part, time_part)) = timestamp.split_once(' ') {
        // MM-DD from the date and HH:MM from the time
        if let (Some(month_day), Some(hour_min)) = (date_part.get(5..10), time_part.get(0..5)) {
            return format!("{} {}", month_day, hour_min);
        }
    }
    // Fallback to original timestamp if parsing fails
    timestamp.to_string()
}

/// Age of a settle time relative to `now`, e.g. `12s ago` or `4m ago`
pub fn format_age(settled_at: Option<DateTime<Local>>, now: DateTime<Local>) -> String {
    let Some(settled_at) = settled_at else {
        return "never".to_string();
    };
    let secs = (now - settled_at).num_seconds().max(0);
    if secs >= 3600 {
        format!("{}h ago", secs / 3600)
    } else if secs >= 60 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}s ago", secs)
    }
}

/// Clean HTTP error messages
pub fn clean_http_error_message(msg: &str) -> String {
    // Replace verbose transport error patterns with cleaner messages
    if msg.contains("error sending request") && msg.contains("Connection refused") {
        return "Connection refused - showing last data".to_string();
    }
    if msg.contains("operation timed out") {
        return "Request timed out - showing last data".to_string();
    }
    if msg.contains("error sending request") {
        return "Network error - showing last data".to_string();
    }
    // Return original message if no HTTP error pattern detected
    msg.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_compact_timestamp() {
        assert_eq!(format_compact_timestamp("2025-03-14 09:26:53"), "03-14 09:26");
        assert_eq!(format_compact_timestamp("garbage"), "garbage");
    }

    #[test]
    fn test_format_age() {
        let now = Local::now();
        assert_eq!(format_age(None, now), "never");
        assert_eq!(format_age(Some(now - Duration::seconds(12)), now), "12s ago");
        assert_eq!(format_age(Some(now - Duration::minutes(4)), now), "4m ago");
        assert_eq!(format_age(Some(now - Duration::hours(5)), now), "5h ago");
    }

    #[test]
    fn test_clean_http_error_message() {
        assert_eq!(
            clean_http_error_message(
                "Network error: error sending request for url (http://localhost:5000/api/trending): Connection refused"
            ),
            "Connection refused - showing last data"
        );
        assert_eq!(clean_http_error_message("HTTP 500"), "HTTP 500");
    }
}
