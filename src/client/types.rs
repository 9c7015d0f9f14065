// Request/response types for the assistant API
//
// Schemas for the three endpoints. Fields the client does not interpret are
// kept as opaque JSON so nothing the server sends is lost.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::config::DEFAULT_USER_ID;

/// Reachability of the assistant server as seen by this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Checking,
    Online,
    Offline,
}

impl ServerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of GET /
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,

    /// Name of the agent serving requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some("healthy")
    }

    pub fn server_status(&self) -> ServerStatus {
        if self.is_healthy() {
            ServerStatus::Online
        } else {
            ServerStatus::Offline
        }
    }
}

/// Body of POST /chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    message: String,
    user_id: String,
}

impl ChatRequest {
    /// Build a request for the default user. Returns None when the message is
    /// blank after trimming.
    pub fn new(message: impl Into<String>) -> Option<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return None;
        }
        Some(Self {
            message,
            user_id: DEFAULT_USER_ID.to_string(),
        })
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Successful reply from POST /chat
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatResponse {
    #[serde(rename = "response")]
    pub response_text: String,

    /// Any other fields the server attached, passed through untouched
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl ChatResponse {
    pub fn new(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            metadata: Map::new(),
        }
    }

    /// Server-side status marker, e.g. "success"
    pub fn status(&self) -> Option<&str> {
        self.metadata.get("status").and_then(Value::as_str)
    }
}

/// Error body from POST /chat. `detail` may be a string or a structured
/// validation report; only the string form is surfaced.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn detail_text(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Body of GET /agent-info. The client does not interpret its shape; the
/// accessors are conveniences that yield nothing when a field is absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AgentInfo(pub Map<String, Value>);

impl AgentInfo {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(Value::as_str)
    }

    pub fn capabilities(&self) -> Vec<&str> {
        self.get("capabilities")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_wire_shape() {
        let request = ChatRequest::new("I want a $250,000 home loan")
            .unwrap()
            .with_user_id("user_123");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"message": "I want a $250,000 home loan", "user_id": "user_123"})
        );
    }

    #[test]
    fn test_chat_request_defaults_user() {
        let request = ChatRequest::new("Hello").unwrap();
        assert_eq!(request.user_id(), "default");
    }

    #[test]
    fn test_chat_request_rejects_blank() {
        assert!(ChatRequest::new("").is_none());
        assert!(ChatRequest::new("   \n\t").is_none());
    }

    #[test]
    fn test_chat_response_keeps_metadata() {
        let response: ChatResponse =
            serde_json::from_value(json!({"response": "Hi there", "status": "success"})).unwrap();
        assert_eq!(response.response_text, "Hi there");
        assert_eq!(response.status(), Some("success"));
    }

    #[test]
    fn test_chat_response_requires_text() {
        let result: Result<ChatResponse, _> = serde_json::from_value(json!({"status": "success"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_health_report_mapping() {
        let healthy: HealthReport = serde_json::from_value(json!({
            "status": "healthy",
            "agent": "finsight-ai-local",
            "server_url": "http://localhost:8000"
        }))
        .unwrap();
        assert_eq!(healthy.server_status(), ServerStatus::Online);
        assert_eq!(healthy.agent.as_deref(), Some("finsight-ai-local"));

        let degraded: HealthReport =
            serde_json::from_value(json!({"status": "degraded"})).unwrap();
        assert_eq!(degraded.server_status(), ServerStatus::Offline);

        let shapeless: HealthReport = serde_json::from_value(json!({"ok": true})).unwrap();
        assert_eq!(shapeless.server_status(), ServerStatus::Offline);
    }

    #[test]
    fn test_error_body_detail_forms() {
        let text: ErrorBody = serde_json::from_value(json!({"detail": "model overloaded"})).unwrap();
        assert_eq!(text.detail_text().as_deref(), Some("model overloaded"));

        let structured: ErrorBody =
            serde_json::from_value(json!({"detail": [{"loc": ["body"], "msg": "field required"}]}))
                .unwrap();
        assert_eq!(structured.detail_text(), None);
    }

    #[test]
    fn test_agent_info_accessors() {
        let info: AgentInfo = serde_json::from_value(json!({
            "name": "finsight-ai-local",
            "description": "Financial advisor",
            "capabilities": ["Tax Assistance", "Scam Detection", 7]
        }))
        .unwrap();

        assert_eq!(info.name(), Some("finsight-ai-local"));
        assert_eq!(info.description(), Some("Financial advisor"));
        assert_eq!(info.capabilities(), vec!["Tax Assistance", "Scam Detection"]);

        let empty = AgentInfo::default();
        assert_eq!(empty.name(), None);
        assert!(empty.capabilities().is_empty());
    }

    #[test]
    fn test_server_status_display() {
        assert_eq!(ServerStatus::Checking.to_string(), "checking");
        assert_eq!(
            serde_json::to_value(ServerStatus::Offline).unwrap(),
            json!("offline")
        );
    }
}
