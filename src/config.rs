//! Application configuration.

use crate::api::Endpoint;
use crate::api::endpoint::{Metric, Period};
use crate::consts::cli_consts::polling;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid source '{id}': {reason}")]
    InvalidSource { id: String, reason: String },

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Path of the default config file, `~/.trend-dash/config.json`.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let home_path = home::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home_path.join(".trend-dash").join("config.json"))
}

fn default_true() -> bool {
    true
}

/// One polled widget: which endpoint, how often, and whether it is active.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SourceSpec {
    pub id: String,
    pub endpoint: Endpoint,
    pub interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl SourceSpec {
    pub fn new(id: impl Into<String>, endpoint: Endpoint, interval_ms: u64) -> Self {
        Self {
            id: id.into(),
            endpoint,
            interval_ms,
            initial_delay_ms: None,
            timeout_ms: None,
            enabled: true,
        }
    }

    pub fn with_initial_delay_ms(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = Some(delay_ms);
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms.unwrap_or(0))
    }

    pub fn fetch_timeout(&self) -> Duration {
        self.timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(polling::default_fetch_timeout)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// Overrides the environment's API URL when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub sources: Vec<SourceSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: None,
            sources: default_sources(),
        }
    }
}

/// The widgets of the stock dashboard.
pub fn default_sources() -> Vec<SourceSpec> {
    vec![
        SourceSpec::new(
            "trending",
            Endpoint::Trending {
                limit: 10,
                hours: 24,
            },
            polling::TRENDING_INTERVAL_MS,
        ),
        SourceSpec::new(
            "articles",
            Endpoint::TrendingArticles,
            polling::TRENDING_INTERVAL_MS,
        )
        .with_initial_delay_ms(2_000),
        SourceSpec::new(
            "engagement",
            Endpoint::EngagementSummary {
                period: Period::Daily,
            },
            polling::ENGAGEMENT_INTERVAL_MS,
        ),
        SourceSpec::new(
            "top-engaged",
            Endpoint::TopEngagedTopics {
                period: Period::Daily,
                metric: Metric::Likes,
                limit: 10,
                category: None,
            },
            polling::ENGAGEMENT_INTERVAL_MS,
        ),
        SourceSpec::new(
            "recommendations",
            Endpoint::Recommendations {
                limit: 10,
                category: None,
                min_confidence: None,
            },
            polling::RECOMMENDATIONS_INTERVAL_MS,
        ),
        SourceSpec::new(
            "scheduler",
            Endpoint::SchedulerStatus,
            polling::STATUS_INTERVAL_MS,
        ),
    ]
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns a `ConfigError` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)?;
        Ok(config)
    }

    /// Loads the config at `path` if it exists, otherwise the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Sources that should be registered.
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceSpec> {
        self.sources.iter().filter(|source| source.enabled)
    }

    /// Rejects duplicate ids and endpoint parameters the server would refuse.
    /// Interval limits are enforced again by the poller at registration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for source in &self.sources {
            let invalid = |reason: String| ConfigError::InvalidSource {
                id: source.id.clone(),
                reason,
            };
            if !seen.insert(source.id.as_str()) {
                return Err(invalid("duplicate id".to_string()));
            }
            if source.interval_ms < polling::MIN_INTERVAL_MS {
                return Err(invalid(format!(
                    "interval_ms must be at least {}",
                    polling::MIN_INTERVAL_MS
                )));
            }
            source.endpoint.validate().map_err(invalid)?;
        }
        Ok(())
    }
}
