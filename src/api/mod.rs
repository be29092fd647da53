use crate::api::error::ApiError;
use serde_json::Value;

pub(crate) mod client;
pub use client::DashboardClient;
pub mod endpoint;
pub use endpoint::Endpoint;
pub mod error;
pub mod error_handler;
pub mod fetcher;
pub use fetcher::EndpointFetcher;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// Performs the request for an endpoint and returns the parsed JSON body.
    async fn request(&self, endpoint: &Endpoint) -> Result<Value, ApiError>;
}
