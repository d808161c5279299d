//! Factories for the collaborators a run needs.

use std::sync::Arc;

use langgraph_core::ChatModel;
use llm::GeminiClient;
use tooling::gateway::{McpClient, ToolGateway};

use crate::config::ServerConfig;
use crate::Result;

/// Builds the model and gateway for each run.
///
/// Each call to [`tool_gateway`](Self::tool_gateway) must return a gateway
/// the caller may close without affecting other runs.
pub trait WorkflowBackend: Send + Sync {
    fn chat_model(&self, api_key: &str) -> Result<Arc<dyn ChatModel>>;

    fn tool_gateway(&self) -> Arc<dyn ToolGateway>;

    /// Sampling temperature for model calls, if any.
    fn temperature(&self) -> Option<f32> {
        None
    }
}

/// Gemini over HTTP plus a fresh MCP subprocess per run.
pub struct LiveBackend {
    config: Arc<ServerConfig>,
}

impl LiveBackend {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self { config }
    }
}

impl WorkflowBackend for LiveBackend {
    fn chat_model(&self, api_key: &str) -> Result<Arc<dyn ChatModel>> {
        let client = GeminiClient::new(self.config.gemini.client_config(api_key))?;
        Ok(Arc::new(client))
    }

    fn tool_gateway(&self) -> Arc<dyn ToolGateway> {
        Arc::new(McpClient::new(self.config.mcp.clone()))
    }

    fn temperature(&self) -> Option<f32> {
        Some(self.config.gemini.temperature)
    }
}
