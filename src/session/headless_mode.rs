//! Headless mode execution

use super::{
    SessionData,
    messages::{
        print_session_exit_success, print_session_shutdown, print_session_starting,
        print_summary_lines,
    },
};
use crate::events::{Event, EventType, Origin};
use crate::poller::PollerRegistry;
use crate::render::summarize;
use std::error::Error;

/// Runs the application in headless mode
///
/// This function handles:
/// 1. Console event logging, with the current summary after each update
/// 2. Ctrl+C shutdown handling
/// 3. Event loop management
///
/// # Arguments
/// * `session` - Session data from setup
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", &session.base_url, session.registry.len());

    // Event loop: log events to console until Ctrl+C
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                print_event(&session.registry, &event);
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    print_session_shutdown();
    session.registry.shutdown();
    print_session_exit_success();

    Ok(())
}

fn print_event(registry: &PollerRegistry, event: &Event) {
    if !event.should_display() {
        return;
    }
    println!("{}", event);

    if let (EventType::Success, Origin::Source(id)) = (event.event_type, &event.origin) {
        if let Some(value) = registry.get_snapshot(id).and_then(|s| s.last_value) {
            print_summary_lines(&summarize(&value));
        }
    }
}
