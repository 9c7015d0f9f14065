// Configuration structs

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_USER_ID: &str = "default";

/// Connection settings for the assistant API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, e.g. "http://localhost:8000"
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User id sent with every chat request
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Request timeout in seconds. None leaves the transport default in place.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_id: default_user_id(),
            timeout_seconds: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Base URL without trailing slash, ready for path joins
    pub fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
