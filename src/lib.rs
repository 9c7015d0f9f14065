// FinSight chat client
// Library exports

pub mod cli; // Terminal front end
pub mod client; // HTTP client for the assistant API
pub mod config;
pub mod errors;
pub mod session; // Chat session controller and observable state

pub use client::{AgentInfo, ApiClient, ChatApi, ChatRequest, ChatResponse, HealthReport, ServerStatus};
pub use config::ClientConfig;
pub use errors::ClientError;
pub use session::{ChatSession, SessionState, SubmitOutcome};
