//! Registry of polled data sources

use super::error::PollerError;
use super::source::{DataSourceConfig, DataSourceHandle, Snapshot, wait_for_settle};
use super::worker::SourceWorker;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Registry-side state of one source. The worker task owns everything else.
struct SourceEntry {
    snapshots: watch::Receiver<Snapshot>,
    refresh_requests: mpsc::UnboundedSender<()>,
    cancel: CancellationToken,
    dispatch: Arc<Mutex<()>>,
    worker: JoinHandle<()>,
}

impl SourceEntry {
    /// Stops the timer. An in-flight fetch runs to completion but its result
    /// is discarded.
    fn stop(self) {
        let _guard = self
            .dispatch
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.cancel.cancel();
        // Detach: the worker exits on its own once its fetch returns.
        drop(self.worker);
    }
}

/// Owns a set of independently polled data sources, keyed by id.
///
/// Registries are plain values; tests and sessions each create their own.
/// Dropping a registry cancels every source it still owns.
#[derive(Default)]
pub struct PollerRegistry {
    sources: Mutex<HashMap<String, SourceEntry>>,
}

impl PollerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn sources(&self) -> MutexGuard<'_, HashMap<String, SourceEntry>> {
        self.sources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Validates and starts a source. Must be called from within a tokio
    /// runtime. A source already registered under the same id is cancelled
    /// and replaced.
    pub fn register(&self, config: DataSourceConfig) -> Result<DataSourceHandle, PollerError> {
        config.validate()?;

        let id = config.id.clone();
        let (snapshot_sender, snapshots) = watch::channel(Snapshot::idle());
        let (refresh_sender, refresh_receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let dispatch = Arc::new(Mutex::new(()));

        debug!(
            "[{}] registering (interval {}ms, timeout {}ms)",
            id,
            config.interval.as_millis(),
            config.fetch_timeout.as_millis()
        );

        let worker = SourceWorker::new(
            config,
            snapshot_sender,
            refresh_receiver,
            cancel.clone(),
            dispatch.clone(),
        );
        let entry = SourceEntry {
            snapshots: snapshots.clone(),
            refresh_requests: refresh_sender,
            cancel,
            dispatch,
            worker: tokio::spawn(worker.run()),
        };

        let replaced = self.sources().insert(id.clone(), entry);
        if let Some(previous) = replaced {
            info!("[{}] replaced existing source", id);
            previous.stop();
        }

        Ok(DataSourceHandle::new(id, snapshots))
    }

    /// Cancels and removes a source. Returns false if the id was unknown.
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.sources().remove(id);
        match removed {
            Some(entry) => {
                entry.stop();
                debug!("[{}] unregistered", id);
                true
            }
            None => false,
        }
    }

    /// Forces an out-of-cycle attempt and waits for it to settle.
    ///
    /// If an attempt is already in flight no new fetch is issued; the call
    /// resolves when that attempt settles. Returns `None` for unknown ids or
    /// if the source is unregistered while waiting.
    pub async fn refresh_now(&self, id: &str) -> Option<Snapshot> {
        let (mut snapshots, refresh_requests) = {
            let sources = self.sources();
            let entry = sources.get(id)?;
            (entry.snapshots.clone(), entry.refresh_requests.clone())
        };

        let current = snapshots.borrow_and_update().clone();
        if !current.is_in_flight() {
            refresh_requests.send(()).ok()?;
        }
        wait_for_settle(&mut snapshots, current.settled_count).await
    }

    /// Current snapshot of a source. Never waits on a fetch.
    pub fn get_snapshot(&self, id: &str) -> Option<Snapshot> {
        self.sources()
            .get(id)
            .map(|entry| entry.snapshots.borrow().clone())
    }

    /// Ids of all registered sources, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sources().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources().is_empty()
    }

    /// Cancels every source. The registry stays usable afterwards.
    pub fn shutdown(&self) {
        let drained: Vec<(String, SourceEntry)> = self.sources().drain().collect();
        for (id, entry) in drained {
            entry.stop();
            debug!("[{}] stopped on shutdown", id);
        }
    }
}

impl Drop for PollerRegistry {
    fn drop(&mut self) {
        self.shutdown();
    }
}
