//! Configuration module for orchestrator
//!
//! Server configuration: listener, Gemini model, MCP tool provider and
//! feedback-loop defaults.

pub mod server;

pub use server::{
    GeminiConfig, ListenConfig, ServerConfig, ServerConfigError, WorkflowConfig,
};
