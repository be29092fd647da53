//! Poller/renderer pipeline
//!
//! A [`PollerRegistry`] owns named data sources. Each source fetches on its own
//! interval, hands results to its renderer, and keeps showing the last good
//! value when a fetch fails.

pub mod error;
mod registry;
pub mod source;
mod worker;

pub use error::{FetchError, PollerError};
pub use registry::PollerRegistry;
pub use source::{DataSourceConfig, DataSourceHandle, Fetcher, Renderer, Snapshot, SourceState};
