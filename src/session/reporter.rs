// Error reporting hook for the host application

use std::fmt;
use tracing::warn;

use crate::errors::ClientError;

/// Which controller operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SendMessage,
    AgentInfo,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::SendMessage => f.write_str("send_message"),
            Operation::AgentInfo => f.write_str("agent_info"),
        }
    }
}

/// Receives every classified failure the controller handles
///
/// Health-check failures are not reported; they only show up as `Offline`.
pub trait ErrorReporter: Send + Sync {
    /// `stale` is true when a newer send superseded the failing one
    fn report(&self, operation: Operation, error: &ClientError, stale: bool);
}

/// Default reporter: structured log lines via tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, operation: Operation, error: &ClientError, stale: bool) {
        warn!(
            operation = %operation,
            unavailable = error.is_unavailable(),
            status = ?error.status(),
            stale,
            "{}",
            error
        );
    }
}
