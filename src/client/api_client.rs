// Assistant API client implementation
//
// HTTP client for the three assistant endpoints. Owns no session state; every
// call is exactly one round trip with no retry and no caching.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::{AgentInfo, ChatRequest, ChatResponse, ErrorBody, HealthReport, ServerStatus};
use super::ChatApi;
use crate::config::ClientConfig;
use crate::errors::{describe_transport_error, ClientError};

/// HTTP client for the FinSight assistant server
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Build a client for the configured server. Does not contact the server.
    pub fn new(config: ClientConfig) -> Result<Self> {
        crate::config::validate(&config)?;

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        let base_url = config.root().to_string();
        debug!(base_url = %base_url, "Created API client");

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Create a client for http://localhost:8000
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch the full health body from GET /
    ///
    /// Unlike `check_health`, this surfaces the failure instead of folding it
    /// into `Offline`.
    pub async fn health_report(&self) -> Result<HealthReport, ClientError> {
        let url = self.url("/");
        debug!(url = %url, "Checking server health");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::unavailable(describe_transport_error(&e)))?;

        parse_json(response).await
    }

    /// Probe the server. Never fails: anything but `{"status": "healthy"}`
    /// is `Offline`.
    pub async fn check_health(&self) -> ServerStatus {
        match self.health_report().await {
            Ok(report) => report.server_status(),
            Err(e) => {
                debug!(error = %e, "Health check failed");
                ServerStatus::Offline
            }
        }
    }

    /// Send a chat message with POST /chat
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let url = self.url("/chat");
        debug!(url = %url, user_id = request.user_id(), "Sending chat message");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let reason = describe_transport_error(&e);
                warn!(reason = %reason, "Chat request did not reach the server");
                ClientError::unavailable(reason)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail_text());
            let err = ClientError::request_failed(status.as_u16(), detail);
            warn!(status = status.as_u16(), detail = %err, "Server rejected chat request");
            return Err(err);
        }

        parse_json(response).await
    }

    /// Fetch agent metadata with GET /agent-info
    pub async fn get_agent_info(&self) -> Result<AgentInfo, ClientError> {
        let url = self.url("/agent-info");
        debug!(url = %url, "Fetching agent info");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::unavailable(describe_transport_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::unavailable(format!(
                "agent info returned status {}",
                status
            )));
        }

        parse_json(response).await
    }
}

/// Read a body and decode it, treating anything undecodable as Unavailable
async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::unavailable(describe_transport_error(&e)))?;

    serde_json::from_str(&body)
        .map_err(|e| ClientError::unavailable(format!("malformed response: {}", e)))
}

#[async_trait]
impl ChatApi for ApiClient {
    async fn check_health(&self) -> ServerStatus {
        ApiClient::check_health(self).await
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        ApiClient::send_message(self, request).await
    }

    async fn get_agent_info(&self) -> Result<AgentInfo, ClientError> {
        ApiClient::get_agent_info(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_without_double_slash() {
        let client = ApiClient::new(ClientConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/chat"), "http://localhost:8000/chat");
        assert_eq!(client.url("/"), "http://localhost:8000/");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ApiClient::new(ClientConfig::new("localhost:8000")).is_err());
    }

    #[test]
    fn test_defaults() {
        let client = ApiClient::with_defaults().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.config().user_id, "default");
    }
}
