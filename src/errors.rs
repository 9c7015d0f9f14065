// Client error taxonomy and user-friendly messages
//
// Every network call made by the API client resolves to either a value or a
// ClientError. The two variants let callers tell "server said no" apart from
// "server could not be reached".

use thiserror::Error;

/// Generic detail used when the server rejects a request without saying why
pub const GENERIC_REQUEST_FAILURE: &str = "Failed to get response";

/// Classified failure from the assistant API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Server unreachable, or it answered with something we could not interpret
    #[error("Server unavailable: {reason}")]
    Unavailable { reason: String },

    /// Server reachable but rejected the request with an error status
    #[error("{detail}")]
    RequestFailed { status: u16, detail: String },
}

impl ClientError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Build a RequestFailed, falling back to the generic detail when the
    /// server did not provide one
    pub fn request_failed(status: u16, detail: Option<String>) -> Self {
        let detail = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string());
        Self::RequestFailed { status, detail }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// HTTP status for RequestFailed, None for Unavailable
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Classify a reqwest transport error into a short reason string
pub(crate) fn describe_transport_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_decode() {
        "malformed response"
    } else if err.is_body() {
        "body error"
    } else if err.is_request() {
        "request error"
    } else {
        "transport error"
    };
    format!("{}: {}", kind, err)
}

/// Format an offline server hint for the terminal
pub fn connection_refused_error(base_url: &str) -> String {
    format!(
        "Could not reach the FinSight server at {}\n\n\
        \x1b[1;33mPossible causes:\x1b[0m\n\
        • Server is not running\n\
        • Wrong base URL\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Start the local server on port 8000\n\
        2. Check the base URL:\n\
           \x1b[36mfinsight --base-url http://host:port\x1b[0m\n\
        3. Refresh the status with \x1b[36m/status\x1b[0m",
        base_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_uses_server_detail() {
        let err = ClientError::request_failed(500, Some("model overloaded".to_string()));
        assert_eq!(err.to_string(), "model overloaded");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_request_failed_generic_detail() {
        let err = ClientError::request_failed(422, None);
        assert_eq!(err.to_string(), GENERIC_REQUEST_FAILURE);

        let blank = ClientError::request_failed(400, Some("  ".to_string()));
        assert_eq!(blank.to_string(), GENERIC_REQUEST_FAILURE);
    }

    #[test]
    fn test_unavailable_message() {
        let err = ClientError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Server unavailable: connection refused");
        assert!(err.is_unavailable());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_connection_hint_names_url() {
        let hint = connection_refused_error("http://localhost:9999");
        assert!(hint.contains("http://localhost:9999"));
    }
}
