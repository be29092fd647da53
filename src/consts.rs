pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all configuration constants for the dashboard,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Maximum number of buffered events between renderers and the session loop
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Maximum number of summary lines rendered per source
    pub const MAX_SUMMARY_LINES: usize = 10;

    // =============================================================================
    // POLLING CONFIGURATION
    // =============================================================================

    /// Source scheduling limits and defaults
    pub mod polling {
        use std::time::Duration;

        /// Lowest accepted refresh interval (milliseconds)
        pub const MIN_INTERVAL_MS: u64 = 1000;

        /// Fetch timeout applied when a source does not configure one (milliseconds)
        pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

        /// Refresh interval for trending lists and articles (milliseconds)
        pub const TRENDING_INTERVAL_MS: u64 = 30_000;

        /// Refresh interval for engagement summaries (milliseconds)
        pub const ENGAGEMENT_INTERVAL_MS: u64 = 5 * 60_000;

        /// Refresh interval for AI recommendations (milliseconds)
        /// Matches the 4 hour generation cycle of the recommender
        pub const RECOMMENDATIONS_INTERVAL_MS: u64 = 4 * 60 * 60_000;

        /// Refresh interval for the scheduler status widget (milliseconds)
        pub const STATUS_INTERVAL_MS: u64 = 30_000;

        pub const fn min_interval() -> Duration {
            Duration::from_millis(MIN_INTERVAL_MS)
        }

        pub const fn default_fetch_timeout() -> Duration {
            Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS)
        }
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client settings
    pub mod network {
        use std::time::Duration;

        /// Connect timeout for the dashboard API (seconds)
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Upper bound for any single request, independent of source timeouts (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 30;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // SEARCH CONFIGURATION
    // =============================================================================

    /// Limits applied to search queries before they are sent
    pub mod search {
        /// Longest accepted query, in characters
        pub const MAX_QUERY_LEN: usize = 200;
    }

    // =============================================================================
    // WORKFLOW LAUNCHER
    // =============================================================================

    /// Fixed environment for the workflow automation process
    pub mod workflow {
        /// Default command used to start the workflow engine
        pub const DEFAULT_PROGRAM: &str = "n8n";
        pub const DEFAULT_ARGS: &[&str] = &["start"];

        pub const HOST: &str = "localhost";
        pub const PORT: u16 = 5678;
        pub const PROTOCOL: &str = "http";
    }
}
