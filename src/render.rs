//! Rendering of endpoint results
//!
//! Results are treated as opaque JSON. Lists become one line per item built
//! from whichever well-known fields are present; objects become `key: value`
//! lines.

use crate::api::error_handler::ErrorHandler;
use crate::consts::cli_consts::MAX_SUMMARY_LINES;
use crate::events::{EventSender, EventType};
use crate::logging::LogLevel;
use crate::poller::{FetchError, Renderer};
use serde_json::{Map, Value};

/// Wrapper keys the API uses around result lists.
const LIST_KEYS: &[&str] = &["results", "articles", "data"];

/// Fields that name an item, in order of preference.
const TITLE_KEYS: &[&str] = &["title", "topic", "name", "query"];

/// Fields appended to an item's title when present.
const DETAIL_KEYS: &[&str] = &[
    "score",
    "confidence",
    "change",
    "category",
    "source",
    "url",
];

/// Summarize a result into display lines, at most `MAX_SUMMARY_LINES`.
pub fn summarize(value: &Value) -> Vec<String> {
    let lines = match value {
        Value::Array(items) => items.iter().map(summarize_item).collect(),
        Value::Object(fields) => match list_field(fields) {
            Some(items) => items.iter().map(summarize_item).collect(),
            None => summarize_fields(fields),
        },
        Value::Null => Vec::new(),
        scalar => vec![scalar_text(scalar)],
    };
    lines.into_iter().take(MAX_SUMMARY_LINES).collect()
}

/// Short description of a result, e.g. for the activity log.
pub fn headline(value: &Value) -> String {
    match value {
        Value::Array(items) => count_label(items.len()),
        Value::Object(fields) => match list_field(fields) {
            Some(items) => count_label(items.len()),
            None => format!("{} fields", fields.len()),
        },
        Value::Null => "empty response".to_string(),
        scalar => scalar_text(scalar),
    }
}

fn count_label(count: usize) -> String {
    match count {
        0 => "no items".to_string(),
        1 => "1 item".to_string(),
        n => format!("{} items", n),
    }
}

fn list_field(fields: &Map<String, Value>) -> Option<&Vec<Value>> {
    LIST_KEYS
        .iter()
        .find_map(|key| fields.get(*key).and_then(Value::as_array))
}

fn summarize_item(item: &Value) -> String {
    let Value::Object(fields) = item else {
        return scalar_text(item);
    };

    let title = TITLE_KEYS
        .iter()
        .find_map(|key| fields.get(*key).filter(|v| !v.is_null()))
        .map(scalar_text)
        .unwrap_or_else(|| "(untitled)".to_string());

    let details: Vec<String> = DETAIL_KEYS
        .iter()
        .filter_map(|key| {
            fields
                .get(*key)
                .filter(|v| !v.is_null() && !v.is_object() && !v.is_array())
                .map(|v| format!("{}={}", key, scalar_text(v)))
        })
        .collect();

    if details.is_empty() {
        title
    } else {
        format!("{} ({})", title, details.join(", "))
    }
}

fn summarize_fields(fields: &Map<String, Value>) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, v)| !v.is_object() && !v.is_array())
        .map(|(key, v)| format!("{}: {}", key, scalar_text(v)))
        .collect()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.2}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

/// Reports every settled attempt of one source on the event channel.
pub struct EventRenderer {
    source_id: String,
    events: EventSender,
    error_handler: ErrorHandler,
}

impl EventRenderer {
    pub fn new(source_id: impl Into<String>, events: EventSender) -> Self {
        Self {
            source_id: source_id.into(),
            events,
            error_handler: ErrorHandler::new(),
        }
    }
}

impl Renderer for EventRenderer {
    fn render(&self, value: &Value) {
        self.events.send_source_event(
            &self.source_id,
            format!("Updated: {}", headline(value)),
            EventType::Success,
            LogLevel::Info,
        );
    }

    fn on_error(&self, error: &FetchError) {
        let level = self.error_handler.classify_error(error);
        self.events.send_source_event(
            &self.source_id,
            format!("Refresh failed, keeping last data: {}", error),
            EventType::Error,
            level,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Origin;
    use serde_json::json;
    use tokio::sync::mpsc;

    #[test]
    fn test_summarize_trending_list() {
        let value = json!([
            { "topic": "AI regulation", "score": 87, "change": "+12%", "category": "Politics", "timestamp": null },
            { "topic": "Rust 2024", "score": 64, "category": "Tech" }
        ]);
        assert_eq!(
            summarize(&value),
            vec![
                "AI regulation (score=87, change=+12%, category=Politics)".to_string(),
                "Rust 2024 (score=64, category=Tech)".to_string(),
            ]
        );
    }

    #[test]
    fn test_summarize_search_results_wrapper() {
        let value = json!({
            "query": "rust",
            "results": [
                { "title": "The Rust Book", "url": "https://doc.rust-lang.org/book/", "description": "...", "source": "google" }
            ]
        });
        assert_eq!(
            summarize(&value),
            vec!["The Rust Book (source=google, url=https://doc.rust-lang.org/book/)".to_string()]
        );
        assert_eq!(headline(&value), "1 item");
    }

    #[test]
    fn test_summarize_object_fields() {
        let value = json!({ "running": false, "error": "Scheduler not initialized", "jobs": [] });
        assert_eq!(
            summarize(&value),
            vec![
                "error: Scheduler not initialized".to_string(),
                "running: false".to_string(),
            ]
        );
    }

    #[test]
    fn test_summarize_formats_confidence_and_caps_lines() {
        let items: Vec<Value> = (0..25)
            .map(|i| json!({ "topic": format!("t{}", i), "confidence": 0.875 }))
            .collect();
        let lines = summarize(&Value::Array(items));
        assert_eq!(lines.len(), MAX_SUMMARY_LINES);
        assert_eq!(lines[0], "t0 (confidence=0.88)");
    }

    #[test]
    fn test_renderer_reports_success_and_failure() {
        let (sender, mut receiver) = mpsc::channel(4);
        let renderer = EventRenderer::new("trending", EventSender::new(sender));

        renderer.render(&json!([1, 2, 3]));
        renderer.on_error(&FetchError::Status {
            status: 503,
            message: "busy".to_string(),
        });

        let success = receiver.try_recv().unwrap();
        assert_eq!(success.origin, Origin::Source("trending".to_string()));
        assert_eq!(success.event_type, EventType::Success);
        assert_eq!(success.msg, "Updated: 3 items");

        let failure = receiver.try_recv().unwrap();
        assert_eq!(failure.event_type, EventType::Error);
        assert_eq!(failure.log_level, LogLevel::Warn);
        assert!(failure.msg.contains("keeping last data"));
    }
}
