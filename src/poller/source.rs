//! Data source definitions: capabilities, configuration and snapshots

use super::error::{FetchError, PollerError};
use crate::consts::cli_consts::polling;
use chrono::{DateTime, Local};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[cfg(test)]
use mockall::automock;

/// Produces the latest value for a source. One call per attempt.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self) -> Result<Value, FetchError>;
}

/// Receives the outcome of every settled attempt for one source.
#[cfg_attr(test, automock)]
pub trait Renderer: Send + Sync {
    /// Called with the fresh value after a successful fetch.
    fn render(&self, value: &Value);

    /// Called after a failed fetch. The previous value is still current, so
    /// implementations should not clear what they displayed.
    fn on_error(&self, error: &FetchError);
}

/// Lifecycle state of a source.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum SourceState {
    /// Registered, first attempt not started yet.
    Idle,
    /// An attempt is in flight.
    Fetching,
    /// The last attempt succeeded.
    Settled,
    /// The last attempt failed. `last_value` may still hold older data.
    Failed,
}

/// Point-in-time view of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: SourceState,
    /// Most recent successful result.
    pub last_value: Option<Value>,
    /// Most recent failure, cleared by the next success.
    pub last_error: Option<FetchError>,
    /// Number of attempts that have settled, successfully or not.
    pub settled_count: u64,
    pub last_settled_at: Option<DateTime<Local>>,
}

impl Snapshot {
    pub(crate) fn idle() -> Self {
        Self {
            state: SourceState::Idle,
            last_value: None,
            last_error: None,
            settled_count: 0,
            last_settled_at: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == SourceState::Fetching
    }

    pub(crate) fn succeed(&mut self, value: Value) {
        self.last_value = Some(value);
        self.last_error = None;
        self.settle(SourceState::Settled);
    }

    pub(crate) fn fail(&mut self, error: FetchError) {
        self.last_error = Some(error);
        self.settle(SourceState::Failed);
    }

    fn settle(&mut self, state: SourceState) {
        self.state = state;
        self.settled_count += 1;
        self.last_settled_at = Some(Local::now());
    }
}

/// Everything needed to register a source.
#[derive(Clone)]
pub struct DataSourceConfig {
    pub id: String,
    /// Delay between one attempt settling and the next one starting.
    pub interval: Duration,
    /// Delay before the first attempt. Zero starts immediately.
    pub initial_delay: Duration,
    pub fetch_timeout: Duration,
    pub fetcher: Arc<dyn Fetcher>,
    pub renderer: Arc<dyn Renderer>,
}

impl DataSourceConfig {
    pub fn new(
        id: impl Into<String>,
        interval: Duration,
        fetcher: Arc<dyn Fetcher>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            id: id.into(),
            interval,
            initial_delay: Duration::ZERO,
            fetch_timeout: polling::default_fetch_timeout(),
            fetcher,
            renderer,
        }
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), PollerError> {
        if self.id.trim().is_empty() {
            return Err(PollerError::invalid(&self.id, "id must not be empty"));
        }
        if self.interval < polling::min_interval() {
            return Err(PollerError::invalid(
                &self.id,
                format!(
                    "interval {}ms is below the {}ms minimum",
                    self.interval.as_millis(),
                    polling::MIN_INTERVAL_MS
                ),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(PollerError::invalid(
                &self.id,
                "fetch timeout must be positive",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for DataSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceConfig")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .field("initial_delay", &self.initial_delay)
            .field("fetch_timeout", &self.fetch_timeout)
            .finish_non_exhaustive()
    }
}

/// Returned by `register`. Observes the source without owning it; once the
/// source is unregistered the handle keeps reporting its final snapshot.
#[derive(Debug, Clone)]
pub struct DataSourceHandle {
    id: String,
    snapshots: watch::Receiver<Snapshot>,
}

impl DataSourceHandle {
    pub(crate) fn new(id: String, snapshots: watch::Receiver<Snapshot>) -> Self {
        Self { id, snapshots }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// Waits for the next attempt to settle and returns the resulting snapshot.
    /// Returns `None` if the source went away first.
    pub async fn settled(&mut self) -> Option<Snapshot> {
        let seen = self.snapshots.borrow_and_update().settled_count;
        wait_for_settle(&mut self.snapshots, seen).await
    }
}

/// Resolves once `settled_count` moves past `seen` and no attempt is in flight.
pub(crate) async fn wait_for_settle(
    snapshots: &mut watch::Receiver<Snapshot>,
    seen: u64,
) -> Option<Snapshot> {
    loop {
        {
            let current = snapshots.borrow_and_update();
            if current.settled_count > seen && !current.is_in_flight() {
                return Some(current.clone());
            }
        }
        snapshots.changed().await.ok()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(id: &str, interval_ms: u64) -> DataSourceConfig {
        DataSourceConfig::new(
            id,
            Duration::from_millis(interval_ms),
            Arc::new(MockFetcher::new()),
            Arc::new(MockRenderer::new()),
        )
    }

    #[test]
    fn test_validate_rejects_short_interval() {
        let err = config("trending", 500).validate().unwrap_err();
        assert!(matches!(err, PollerError::InvalidConfig { ref id, .. } if id == "trending"));
        assert!(config("trending", 1000).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        assert!(config("", 1000).validate().is_err());
        assert!(config("   ", 1000).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let cfg = config("search", 1000).with_fetch_timeout(Duration::ZERO);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_failure_keeps_last_value() {
        let mut snapshot = Snapshot::idle();
        snapshot.succeed(json!({"topic": "rust"}));
        snapshot.fail(FetchError::Network("reset".to_string()));

        assert_eq!(snapshot.state, SourceState::Failed);
        assert_eq!(snapshot.last_value, Some(json!({"topic": "rust"})));
        assert_eq!(snapshot.settled_count, 2);

        snapshot.succeed(json!([]));
        assert_eq!(snapshot.last_error, None);
    }
}
