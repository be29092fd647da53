//! Adapts dashboard endpoints to the poller's fetch capability

use crate::api::{DashboardApi, Endpoint};
use crate::poller::{FetchError, Fetcher};
use serde_json::Value;
use std::sync::Arc;

/// Fetches one endpoint through a shared API client.
pub struct EndpointFetcher {
    api: Arc<dyn DashboardApi>,
    endpoint: Endpoint,
}

impl EndpointFetcher {
    pub fn new(api: Arc<dyn DashboardApi>, endpoint: Endpoint) -> Self {
        Self { api, endpoint }
    }
}

#[async_trait::async_trait]
impl Fetcher for EndpointFetcher {
    async fn fetch(&self) -> Result<Value, FetchError> {
        self.api
            .request(&self.endpoint)
            .await
            .map_err(FetchError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::error::ApiError;
    use mockall::predicate::eq;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_passes_endpoint_and_value_through() {
        let mut api = MockDashboardApi::new();
        api.expect_request()
            .with(eq(Endpoint::TrendingArticles))
            .times(1)
            .returning(|_| Ok(json!({ "articles": [] })));

        let fetcher = EndpointFetcher::new(Arc::new(api), Endpoint::TrendingArticles);
        assert_eq!(fetcher.fetch().await, Ok(json!({ "articles": [] })));
    }

    #[tokio::test]
    async fn test_fetch_converts_api_errors() {
        let mut api = MockDashboardApi::new();
        api.expect_request().returning(|_| {
            Err(ApiError::Http {
                status: 500,
                message: "Failed to get engagement summary".to_string(),
            })
        });

        let fetcher = EndpointFetcher::new(
            Arc::new(api),
            Endpoint::EngagementSummary {
                period: Default::default(),
            },
        );
        assert_eq!(
            fetcher.fetch().await,
            Err(FetchError::Status {
                status: 500,
                message: "Failed to get engagement summary".to_string(),
            })
        );
    }
}
