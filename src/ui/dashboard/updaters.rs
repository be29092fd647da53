//! Dashboard state update logic

use super::state::DashboardState;
use crate::poller::PollerRegistry;

impl DashboardState {
    /// Update the dashboard with a new tick, queued events and fresh snapshots.
    pub fn update(&mut self, registry: &PollerRegistry) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }

        self.sources = registry
            .ids()
            .into_iter()
            .filter_map(|id| registry.get_snapshot(&id).map(|snapshot| (id, snapshot)))
            .collect();
        self.ensure_selection();
    }
}
