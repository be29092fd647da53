//! Session setup and initialization

use crate::api::{DashboardApi, DashboardClient, EndpointFetcher};
use crate::config::{Config, SourceSpec};
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::environment::Environment;
use crate::events::{Event, EventSender, EventType};
use crate::poller::{DataSourceConfig, DataSourceHandle, PollerError, PollerRegistry};
use crate::render::EventRenderer;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Session data shared by the headless, TUI and one-shot modes
pub struct SessionData {
    /// Owns every polled source
    pub registry: Arc<PollerRegistry>,
    /// Handles of the registered sources, in config order
    pub handles: Vec<DataSourceHandle>,
    /// Event receiver for renderer events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Sender for session-level events
    pub events: EventSender,
    /// Environment the session was started for
    pub environment: Environment,
    /// API base URL actually used
    pub base_url: String,
}

/// Builds the poller registration for one configured source.
pub fn source_config(
    source: &SourceSpec,
    api: Arc<dyn DashboardApi>,
    events: EventSender,
) -> DataSourceConfig {
    DataSourceConfig::new(
        source.id.clone(),
        source.interval(),
        Arc::new(EndpointFetcher::new(api, source.endpoint.clone())),
        Arc::new(EventRenderer::new(source.id.clone(), events)),
    )
    .with_initial_delay(source.initial_delay())
    .with_fetch_timeout(source.fetch_timeout())
}

/// Registers every enabled source of `config` with `registry`.
pub fn register_sources(
    registry: &PollerRegistry,
    config: &Config,
    api: Arc<dyn DashboardApi>,
    events: &EventSender,
) -> Result<Vec<DataSourceHandle>, PollerError> {
    config
        .enabled_sources()
        .map(|source| registry.register(source_config(source, api.clone(), events.clone())))
        .collect()
}

/// Sets up a polling session
///
/// This function handles all the common setup required for every mode:
/// 1. Validates the config and resolves the API base URL
/// 2. Creates the HTTP client and the event channel
/// 3. Registers every enabled source with a fresh registry
///
/// # Arguments
/// * `config` - Loaded configuration
/// * `env` - Environment to connect to
/// * `base_url_override` - Base URL from the command line, wins over config and environment
pub fn setup_session(
    config: &Config,
    env: Environment,
    base_url_override: Option<String>,
) -> Result<SessionData, Box<dyn Error>> {
    config.validate()?;

    let base_url = base_url_override
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| env.api_url());
    let api: Arc<dyn DashboardApi> = Arc::new(DashboardClient::new(base_url.clone())?);

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let events = EventSender::new(event_sender);

    let registry = Arc::new(PollerRegistry::new());
    let handles = register_sources(&registry, config, api, &events)?;
    if registry.is_empty() {
        log::warn!("No enabled sources in config; nothing will be polled");
    }
    events.send_session_event(
        format!("Polling {} sources from {}", registry.len(), base_url),
        EventType::Info,
    );

    Ok(SessionData {
        registry,
        handles,
        event_receiver,
        events,
        environment: env,
        base_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Endpoint, MockDashboardApi};
    use crate::events::Origin;
    use crate::poller::SourceState;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_sources_wires_fetch_and_render() {
        let mut api = MockDashboardApi::new();
        api.expect_request()
            .returning(|_| Ok(json!([{ "topic": "rust", "score": 90 }])));

        let config = Config {
            base_url: None,
            sources: vec![SourceSpec::new(
                "trending",
                Endpoint::Trending {
                    limit: 1,
                    hours: 24,
                },
                30_000,
            )],
        };
        let (sender, mut receiver) = mpsc::channel(8);
        let registry = PollerRegistry::new();
        let mut handles =
            register_sources(&registry, &config, Arc::new(api), &EventSender::new(sender))
                .unwrap();

        let snapshot = handles[0].settled().await.unwrap();
        assert_eq!(snapshot.state, SourceState::Settled);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.origin, Origin::Source("trending".to_string()));
        assert_eq!(event.event_type, EventType::Success);
    }

    #[tokio::test]
    async fn test_setup_session_rejects_invalid_config() {
        let config = Config {
            base_url: None,
            sources: vec![SourceSpec::new("status", Endpoint::SchedulerStatus, 100)],
        };
        assert!(setup_session(&config, Environment::Local, None).is_err());
    }

    #[tokio::test]
    async fn test_setup_session_prefers_cli_base_url() {
        let config = Config {
            base_url: Some("http://config.invalid".to_string()),
            sources: Vec::new(),
        };
        let mut session = setup_session(
            &config,
            Environment::Local,
            Some("http://cli.invalid".to_string()),
        )
        .unwrap();
        assert_eq!(session.base_url, "http://cli.invalid");
        assert!(session.registry.is_empty());

        let event = session.event_receiver.try_recv().unwrap();
        assert_eq!(event.event_type, EventType::Info);
        assert_eq!(event.msg, "Polling 0 sources from http://cli.invalid");
    }
}
