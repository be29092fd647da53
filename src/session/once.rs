//! One-shot mode: fetch every source once and print the results

use super::{SessionData, messages::print_summary_lines};
use crate::poller::{DataSourceHandle, PollerRegistry, Snapshot, SourceState};
use crate::render::{headline, summarize};
use crate::{print_cmd_error, print_cmd_success};
use futures::future::join_all;
use std::error::Error;

#[derive(Debug, thiserror::Error)]
#[error("{failed} of {total} sources failed")]
pub struct OnceError {
    pub failed: usize,
    pub total: usize,
}

/// Waits for the first settle of every registered source, prints each
/// result and leaves the registry empty.
///
/// Sources fetch on registration, so this only waits. A source whose
/// attempt outlives its fetch timeout settles as `Failed` and is reported.
pub async fn run_once(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    let total = session.handles.len();
    let registry = &session.registry;
    let settled: Vec<Option<Snapshot>> = join_all(
        session
            .handles
            .iter_mut()
            .map(|handle| first_settle(registry, handle)),
    )
    .await;

    let mut failed = 0;
    for (handle, snapshot) in session.handles.iter().zip(settled) {
        match snapshot {
            Some(snapshot) if snapshot.state == SourceState::Settled => {
                let value = snapshot.last_value.unwrap_or_default();
                print_cmd_success!(handle.id(), "{}", headline(&value));
                print_summary_lines(&summarize(&value));
            }
            Some(snapshot) => {
                failed += 1;
                let details = snapshot
                    .last_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no result".to_string());
                print_cmd_error!(handle.id(), &details);
            }
            None => {
                failed += 1;
                print_cmd_error!(handle.id(), "source stopped before settling");
            }
        }
    }

    if failed > 0 {
        return Err(Box::new(OnceError { failed, total }));
    }
    Ok(())
}

/// Waits for the source's first result, then stops polling it.
async fn first_settle(
    registry: &PollerRegistry,
    handle: &mut DataSourceHandle,
) -> Option<Snapshot> {
    let snapshot = handle.snapshot();
    let settled = if snapshot.settled_count > 0 && !snapshot.is_in_flight() {
        Some(snapshot)
    } else {
        handle.settled().await
    };
    registry.unregister(handle.id());
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, MockDashboardApi};
    use crate::config::{Config, SourceSpec};
    use crate::environment::Environment;
    use crate::events::EventSender;
    use crate::session::setup::register_sources;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn session_with(api: MockDashboardApi, sources: Vec<SourceSpec>) -> SessionData {
        let (sender, event_receiver) = mpsc::channel(16);
        let events = EventSender::new(sender);
        let registry = Arc::new(PollerRegistry::new());
        let config = Config {
            base_url: None,
            sources,
        };
        let handles = register_sources(&registry, &config, Arc::new(api), &events).unwrap();
        SessionData {
            registry,
            handles,
            event_receiver,
            events,
            environment: Environment::Local,
            base_url: "http://test.invalid".to_string(),
        }
    }

    #[tokio::test]
    async fn test_once_succeeds_when_all_sources_settle() {
        let mut api = MockDashboardApi::new();
        api.expect_request().returning(|_| Ok(json!({ "running": true })));
        let session = session_with(
            api,
            vec![SourceSpec::new("scheduler", Endpoint::SchedulerStatus, 30_000)],
        );
        let registry = session.registry.clone();

        assert!(run_once(session).await.is_ok());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_once_reports_failed_sources() {
        let mut api = MockDashboardApi::new();
        api.expect_request().returning(|endpoint| match endpoint {
            Endpoint::SchedulerStatus => Ok(json!({ "running": true })),
            _ => Err(crate::api::error::ApiError::Http {
                status: 500,
                message: "boom".to_string(),
            }),
        });
        let session = session_with(
            api,
            vec![
                SourceSpec::new("scheduler", Endpoint::SchedulerStatus, 30_000),
                SourceSpec::new("articles", Endpoint::TrendingArticles, 30_000),
            ],
        );

        let err = run_once(session).await.unwrap_err();
        let err = err.downcast_ref::<OnceError>().unwrap();
        assert_eq!(err.failed, 1);
        assert_eq!(err.total, 2);
    }
}
