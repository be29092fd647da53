//! Dashboard API Client
//!
//! A JSON client for the trending/search/engagement/recommendation endpoints.

use crate::api::DashboardApi;
use crate::api::endpoint::{ApiRequest, Endpoint, Method};
use crate::api::error::ApiError;
use crate::consts::cli_consts::network;
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;

// User-Agent string with CLI version
const USER_AGENT: &str = concat!("trend-dash/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .connect_timeout(network::connect_timeout())
            .timeout(network::request_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn handle_response_status(response: Response) -> Result<Response, ApiError> {
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(response)
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.build_url(&request.path);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = builder
            .header("Accept", "application/json")
            .query(&request.query);
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await?;
        let response = Self::handle_response_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait::async_trait]
impl DashboardApi for DashboardClient {
    async fn request(&self, endpoint: &Endpoint) -> Result<Value, ApiError> {
        self.send(endpoint.request()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_joins_without_double_slashes() {
        let client = DashboardClient::new("http://localhost:5000/").unwrap();
        assert_eq!(
            client.build_url("/api/trending"),
            "http://localhost:5000/api/trending"
        );
        assert_eq!(
            client.build_url("api/scheduler/status"),
            "http://localhost:5000/api/scheduler/status"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_network_error() {
        // Port 9 (discard) on localhost is closed on test machines.
        let client = DashboardClient::new("http://127.0.0.1:9").unwrap();
        let result = client.request(&Endpoint::SchedulerStatus).await;
        assert!(matches!(result, Err(ApiError::Reqwest(_))));
    }
}
