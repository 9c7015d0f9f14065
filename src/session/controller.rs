// Chat session controller
//
// Owns all UI-observable state for one session and sequences the state
// transitions around API calls. State lives in a watch channel: the
// controller is the only writer, the presentation layer subscribes.
//
// Sends are not serialized. Each submission gets a sequence number and only
// the most recent one drives loading/response/error; older ones that finish
// later still land their reply in the transcript but touch nothing else.

use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use super::reporter::{ErrorReporter, Operation, TracingReporter};
use super::state::{RequestPhase, SessionState, FALLBACK_RESPONSE};
use super::transcript::{ChatMessage, Transcript};
use crate::client::{AgentInfo, ApiClient, ChatApi, ChatRequest, ChatResponse, ServerStatus};
use crate::config::ClientConfig;
use crate::errors::ClientError;

/// Session watcher - a receiver that yields on every state transition
pub type SessionWatcher = watch::Receiver<SessionState>;

/// Result of a single submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Blank message; nothing was sent and no state changed
    Ignored,
    Replied(ChatResponse),
    Failed(ClientError),
}

impl SubmitOutcome {
    pub fn reply_text(&self) -> Option<&str> {
        match self {
            SubmitOutcome::Replied(response) => Some(&response.response_text),
            _ => None,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, SubmitOutcome::Ignored)
    }
}

/// Controller for one chat session
pub struct ChatSession<A: ChatApi + ?Sized> {
    api: Arc<A>,
    user_id: String,
    state: watch::Sender<SessionState>,
    health_seq: AtomicU64,
    reporter: Arc<dyn ErrorReporter>,
}

impl ChatSession<ApiClient> {
    /// Build an HTTP-backed session from configuration. Does not probe the
    /// server; call `refresh_status` (or use `start`) for that.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let client = ApiClient::new(config.clone())?;
        Ok(Self::new(Arc::new(client), config.user_id.clone()))
    }
}

impl<A: ChatApi + ?Sized> ChatSession<A> {
    pub fn new(api: Arc<A>, user_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(SessionState::new());
        Self {
            api,
            user_id: user_id.into(),
            state,
            health_seq: AtomicU64::new(0),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Replace the default tracing reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Create a session and run the initial health check
    pub async fn start(api: Arc<A>, user_id: impl Into<String>) -> Self {
        let session = Self::new(api, user_id);
        session.refresh_status().await;
        session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Subscribe to state transitions
    pub fn subscribe(&self) -> SessionWatcher {
        self.state.subscribe()
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn server_status(&self) -> ServerStatus {
        self.state.borrow().server_status
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn transcript(&self) -> Transcript {
        self.state.borrow().transcript.clone()
    }

    /// Send gate for the presentation layer: not loading, non-blank text, and
    /// server not known to be offline
    pub fn can_send(&self, text: &str) -> bool {
        let state = self.state.borrow();
        !state.loading && !text.trim().is_empty() && !state.is_offline()
    }

    /// Re-run the health check: `checking` then `online` or `offline`
    ///
    /// Returns what this probe saw. If a newer refresh started meanwhile, the
    /// result is not published.
    pub async fn refresh_status(&self) -> ServerStatus {
        let seq = self.health_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.server_status = ServerStatus::Checking;
            state.touch();
        });

        let status = self.api.check_health().await;

        let applied = self.state.send_if_modified(|state| {
            if self.health_seq.load(Ordering::SeqCst) != seq {
                return false;
            }
            state.server_status = status;
            state.touch();
            true
        });

        if applied {
            info!(status = %status, "Server status updated");
        } else {
            debug!(status = %status, "Discarding stale health check result");
        }

        status
    }

    /// Submit a user message
    ///
    /// Blank text (after trimming) is ignored without touching state. Otherwise
    /// the user turn is appended before the request goes out, and the outcome
    /// is folded into state when it resolves.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let Some(request) = ChatRequest::new(text) else {
            debug!("Ignoring blank submission");
            return SubmitOutcome::Ignored;
        };
        let request = request.with_user_id(self.user_id.clone());

        let mut seq = 0;
        self.state.send_modify(|state| {
            state.request_seq += 1;
            seq = state.request_seq;
            state.transcript.push(ChatMessage::user(text));
            state.phase = RequestPhase::Sending;
            state.loading = true;
            state.error = None;
            state.touch();
        });
        debug!(seq, "Chat request started");

        let result = self.api.send_message(&request).await;

        let mut stale = false;
        self.state.send_if_modified(|state| {
            stale = state.request_seq != seq;
            let mut changed = false;

            if let Ok(response) = &result {
                state
                    .transcript
                    .push(ChatMessage::assistant(response.response_text.clone()));
                changed = true;
            }

            if !stale {
                state.loading = false;
                match &result {
                    Ok(response) => {
                        state.phase = RequestPhase::Succeeded;
                        state.response = Some(response.response_text.clone());
                    }
                    Err(e) => {
                        state.phase = RequestPhase::Failed;
                        state.error = Some(e.to_string());
                        state.response = Some(FALLBACK_RESPONSE.to_string());
                    }
                }
                changed = true;
            }

            if changed {
                state.touch();
            }
            changed
        });

        if stale {
            debug!(seq, "Chat request superseded by a newer one");
        }

        match result {
            Ok(response) => SubmitOutcome::Replied(response),
            Err(e) => {
                self.reporter.report(Operation::SendMessage, &e, stale);
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Fetch agent info; failures go to the reporter and yield None
    pub async fn get_agent_info(&self) -> Option<AgentInfo> {
        match self.api.get_agent_info().await {
            Ok(info) => Some(info),
            Err(e) => {
                self.reporter.report(Operation::AgentInfo, &e, false);
                None
            }
        }
    }
}
