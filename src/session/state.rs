// Observable session state
//
// A snapshot of everything the presentation layer renders. The controller
// publishes a new snapshot through a watch channel on every transition.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::transcript::Transcript;
use crate::client::ServerStatus;

/// Shown in place of an assistant reply when a send fails
pub const FALLBACK_RESPONSE: &str = "Sorry, there was an error connecting to the assistant.";

/// Where the most recent send stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Sending,
    Succeeded,
    Failed,
}

/// Snapshot of session state for watch channel subscribers
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: Uuid,
    pub server_status: ServerStatus,
    pub phase: RequestPhase,
    pub loading: bool,
    /// Last assistant reply, or the fallback string after a failure
    pub response: Option<String>,
    /// Message of the last failure, cleared when a new send starts
    pub error: Option<String>,
    pub transcript: Transcript,
    /// Sequence number of the most recent submission (0 before any)
    pub request_seq: u64,
    /// Incremented on every change
    pub version: u64,
    pub updated_at: DateTime<Utc>,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            server_status: ServerStatus::Checking,
            phase: RequestPhase::Idle,
            loading: false,
            response: None,
            error: None,
            transcript: Transcript::new(),
            request_seq: 0,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    /// Whether the server is known to be unreachable
    pub fn is_offline(&self) -> bool {
        self.server_status == ServerStatus::Offline
    }

    pub(crate) fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SessionState::new();
        assert_eq!(state.server_status, ServerStatus::Checking);
        assert_eq!(state.phase, RequestPhase::Idle);
        assert!(!state.loading);
        assert!(state.response.is_none());
        assert!(state.error.is_none());
        assert!(state.transcript.is_empty());
        assert_eq!(state.version, 0);
        assert!(!state.is_offline());
    }

    #[test]
    fn test_touch_bumps_version() {
        let mut state = SessionState::new();
        state.touch();
        state.touch();
        assert_eq!(state.version, 2);
    }

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(SessionState::new().session_id, SessionState::new().session_id);
    }
}
