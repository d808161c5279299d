//! Health check endpoint handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::routes::AppState;

pub const SERVICE_NAME: &str = "orchestrator-server";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Open WebSocket sessions.
    pub active_sessions: usize,
}

/// Handler for GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: crate::version().to_string(),
        active_sessions: state.registry.active_sessions(),
    })
}
