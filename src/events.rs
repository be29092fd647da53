//! Event System
//!
//! Types and implementations for source events and logging

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

/// Where an event came from.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Origin {
    /// A registered data source, by id.
    Source(String),
    /// The session itself (startup, shutdown, manual refreshes).
    Session,
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::Source(id) => write!(f, "{}", id),
            Origin::Session => write!(f, "session"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub origin: Origin,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(origin: Origin, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            origin,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn source_with_level(
        source_id: &str,
        msg: String,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self::new(
            Origin::Source(source_id.to_string()),
            msg,
            event_type,
            log_level,
        )
    }

    pub fn session(msg: String, event_type: EventType) -> Self {
        Self::new(Origin::Session, msg, event_type, LogLevel::Info)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] [{}] {}",
            self.event_type, self.timestamp, self.origin, self.msg
        )
    }
}

/// Cloneable sending side of the event channel.
///
/// Renderers run inside poller callbacks, which are synchronous, so sends
/// never wait: when the queue is full the event is dropped.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub fn send_event(&self, event: Event) {
        let _ = self.sender.try_send(event);
    }

    pub fn send_source_event(
        &self,
        source_id: &str,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::source_with_level(
            source_id, message, event_type, log_level,
        ));
    }

    pub fn send_session_event(&self, message: String, event_type: EventType) {
        self.send_event(Event::session(message, event_type));
    }
}
