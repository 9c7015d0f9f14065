// HTTP client for the FinSight assistant API
//
// Provides ApiClient for the health, chat and agent-info endpoints, plus the
// ChatApi trait the session controller talks to.

mod api_client;
pub mod types;

use async_trait::async_trait;

pub use api_client::ApiClient;
pub use types::{AgentInfo, ChatRequest, ChatResponse, HealthReport, ServerStatus};

use crate::errors::ClientError;

/// Backend operations the chat session needs
///
/// `ApiClient` is the HTTP implementation. Every method resolves to a value or
/// a classified `ClientError`; none of them panics on network failure.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Reachability probe. Failures fold into `ServerStatus::Offline`.
    async fn check_health(&self) -> ServerStatus;

    /// Send one chat message and wait for the reply
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    /// Fetch the server's agent description
    async fn get_agent_info(&self) -> Result<AgentInfo, ClientError>;
}
