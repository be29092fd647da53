//! Dashboard state management

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::environment::Environment;
use crate::events::Event as SourceEvent;
use crate::poller::Snapshot;
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::Instant;

/// Dashboard state: the latest snapshot of every source plus the activity log.
#[derive(Debug)]
pub struct DashboardState {
    /// The environment in which the application is running.
    pub environment: Environment,
    /// API base URL being polled.
    pub base_url: String,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Snapshots of the registered sources, ordered by id.
    pub sources: Vec<(String, Snapshot)>,
    /// Queue of events waiting to be processed
    pub pending_events: VecDeque<SourceEvent>,
    /// Activity logs for display
    pub activity_logs: VecDeque<SourceEvent>,
    /// Whether to enable background colors
    pub with_background_color: bool,
    /// Animation tick counter
    pub tick: usize,

    /// Id of the selected source, kept across updates so the selection
    /// follows the source rather than its position.
    selected: Option<String>,
}

impl DashboardState {
    /// Creates a new instance of the dashboard state.
    pub fn new(environment: Environment, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            environment,
            base_url: ui_config.base_url,
            start_time,
            sources: Vec::new(),
            pending_events: VecDeque::new(),
            activity_logs: VecDeque::new(),
            with_background_color: ui_config.with_background_color,
            tick: 0,
            selected: None,
        }
    }

    /// Id of the selected source, if any source is registered.
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.sources.iter().position(|(id, _)| id == selected)
    }

    /// Snapshot of the selected source.
    pub fn selected_snapshot(&self) -> Option<&Snapshot> {
        self.selected_index().map(|index| &self.sources[index].1)
    }

    pub fn select_next(&mut self) {
        self.step_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.step_selection(self.sources.len().saturating_sub(1));
    }

    fn step_selection(&mut self, step: usize) {
        if self.sources.is_empty() {
            return;
        }
        let next = match self.selected_index() {
            Some(index) => (index + step) % self.sources.len(),
            None => 0,
        };
        self.selected = Some(self.sources[next].0.clone());
    }

    /// Keeps the selection on a registered source.
    pub(super) fn ensure_selection(&mut self) {
        if self.selected_index().is_none() {
            self.selected = self.sources.first().map(|(id, _)| id.clone());
        }
    }

    /// Add an event to activity logs with size limit
    pub fn add_to_activity_log(&mut self, event: SourceEvent) {
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Add an event to the processing queue
    pub fn add_event(&mut self, event: SourceEvent) {
        self.pending_events.push_back(event);
    }
}
