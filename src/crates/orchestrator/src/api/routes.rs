//! API route definitions

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::api::middleware::{cors_layer, trace_layer};
use crate::api::{handlers, ws};
use crate::config::ServerConfig;
use crate::workflow::{LiveBackend, WorkflowBackend};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub registry: Arc<ws::SessionRegistry>,
    pub backend: Arc<dyn WorkflowBackend>,
}

impl AppState {
    /// State backed by Gemini and the configured MCP command.
    pub fn new(config: ServerConfig) -> Self {
        let config = Arc::new(config);
        let backend = Arc::new(LiveBackend::new(Arc::clone(&config)));
        Self::with_backend(config, backend)
    }

    pub fn with_backend(config: Arc<ServerConfig>, backend: Arc<dyn WorkflowBackend>) -> Self {
        Self {
            config,
            registry: Arc::new(ws::SessionRegistry::new()),
            backend,
        }
    }
}

/// Build the complete API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/gemini/mcp-status", get(handlers::mcp_status))
        .route("/gemini/ws/feedback-loop", get(ws::feedback_loop_ws))
        .layer(trace_layer())
        .layer(cors_layer())
        .with_state(state)
}
