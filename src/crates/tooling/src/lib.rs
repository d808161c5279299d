//! Tooling for the store operations workflow
//!
//! Shared runtime helpers plus the bridge to the external tool provider.
//!
//! # Modules
//!
//! - `config` - Typed environment variable loading
//! - `logging` - Tracing setup and timing helpers
//! - `gateway` - The [`ToolGateway`](gateway::ToolGateway) trait and the
//!   subprocess-backed [`McpClient`](gateway::McpClient)
//! - `tools` - Adapters exposing gateway tools as
//!   [`Tool`](langgraph_core::Tool)s

pub mod config;
pub mod gateway;
pub mod logging;
pub mod tools;

use thiserror::Error;

/// Errors that can occur in the tooling crate
#[derive(Debug, Error)]
pub enum ToolingError {
    /// Bad or unreadable configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for tooling operations
pub type Result<T> = std::result::Result<T, ToolingError>;

/// Get version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
