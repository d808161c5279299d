//! Orchestration server for the store operations feedback loop
//!
//! Clients open a WebSocket session, send a natural-language request and
//! receive a stream of progress events while the server drives a
//! plan/execute/refresh loop against the MCP tool provider.
//!
//! - [`workflow`] - the feedback loop itself
//! - [`api`] - HTTP routes, the WebSocket session handler and the session registry
//! - [`config`] - server configuration

pub mod api;
pub mod config;
pub mod workflow;

use thiserror::Error;

pub use config::{ServerConfig, ServerConfigError};
pub use workflow::{FeedbackLoopExecutor, WorkflowEvent, WorkflowState};

/// Errors that can occur during orchestration
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Graph build or execution failure
    #[error(transparent)]
    Graph(#[from] langgraph_core::GraphError),

    /// Model client could not be created
    #[error("Model client error: {0}")]
    Llm(#[from] llm::LlmError),

    #[error("Configuration error: {0}")]
    Config(#[from] ServerConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error
    #[error("Orchestrator error: {0}")]
    General(String),
}

/// Result type for orchestrator operations
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
