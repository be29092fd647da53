//! Per-source polling loop
//!
//! Each registered source gets exactly one worker task and attempts run
//! sequentially inside it, so a source never has two fetches in flight.
//! Refresh requests queued before an attempt starts are all answered by it.

use super::error::FetchError;
use super::source::{DataSourceConfig, Snapshot, SourceState};
use log::debug;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;

pub(super) struct SourceWorker {
    config: DataSourceConfig,
    snapshots: watch::Sender<Snapshot>,
    refresh_requests: mpsc::UnboundedReceiver<()>,
    cancel: CancellationToken,
    /// Held while delivering results. `unregister` takes it before cancelling,
    /// so no callback can start after it returns.
    dispatch: Arc<Mutex<()>>,
}

impl SourceWorker {
    pub(super) fn new(
        config: DataSourceConfig,
        snapshots: watch::Sender<Snapshot>,
        refresh_requests: mpsc::UnboundedReceiver<()>,
        cancel: CancellationToken,
        dispatch: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            config,
            snapshots,
            refresh_requests,
            cancel,
            dispatch,
        }
    }

    pub(super) async fn run(mut self) {
        if !self.config.initial_delay.is_zero() {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = sleep(self.config.initial_delay) => {}
                Some(()) = self.refresh_requests.recv() => {}
            }
        }

        loop {
            if !self.attempt().await {
                break;
            }

            // The next tick is measured from the moment this attempt settled.
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = sleep(self.config.interval) => {}
                Some(()) = self.refresh_requests.recv() => {
                    debug!("[{}] out-of-cycle refresh", self.config.id);
                }
            }
        }

        debug!("[{}] worker stopped", self.config.id);
    }

    /// Runs one fetch and delivers its outcome. Returns false once the source
    /// has been cancelled.
    async fn attempt(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }

        // Requests queued before `Fetching` is visible are answered by this attempt.
        self.snapshots
            .send_modify(|snapshot| snapshot.state = SourceState::Fetching);
        while self.refresh_requests.try_recv().is_ok() {}
        debug!("[{}] fetching", self.config.id);

        let outcome = match timeout(self.config.fetch_timeout, self.config.fetcher.fetch()).await
        {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.config.fetch_timeout)),
        };

        let _guard = self
            .dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Late result for a removed source: drop it without touching the view.
        if self.cancel.is_cancelled() {
            debug!("[{}] discarding result of unregistered source", self.config.id);
            return false;
        }

        match outcome {
            Ok(value) => {
                self.snapshots
                    .send_modify(|snapshot| snapshot.succeed(value.clone()));
                self.config.renderer.render(&value);
            }
            Err(error) => {
                debug!("[{}] fetch failed: {}", self.config.id, error);
                self.snapshots
                    .send_modify(|snapshot| snapshot.fail(error.clone()));
                self.config.renderer.on_error(&error);
            }
        }
        true
    }
}
