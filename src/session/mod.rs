// Chat session management
//
// ChatSession drives the UI-observable state (server status, loading flag,
// last response, error, transcript) around calls into a ChatApi backend.

mod controller;
mod reporter;
mod state;
mod transcript;

pub use controller::{ChatSession, SessionWatcher, SubmitOutcome};
pub use reporter::{ErrorReporter, Operation, TracingReporter};
pub use state::{RequestPhase, SessionState, FALLBACK_RESPONSE};
pub use transcript::{ChatMessage, Role, Transcript};
