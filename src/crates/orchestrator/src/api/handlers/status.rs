//! MCP status endpoint handler

use axum::{extract::State, Json};
use langgraph_core::ToolDescriptor;
use serde::{Deserialize, Serialize};
use tooling::gateway::TotalCounts;
use tracing::warn;

use crate::api::routes::AppState;
use crate::workflow::FRAMEWORK;

/// Entity totals as reported by the status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub total_stores: usize,
    pub total_main_stores: usize,
    pub total_orders: usize,
}

impl From<TotalCounts> for SystemSummary {
    fn from(counts: TotalCounts) -> Self {
        Self {
            total_stores: counts.stores,
            total_main_stores: counts.main_stores,
            total_orders: counts.orders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum McpStatusResponse {
    Connected {
        framework: String,
        available_tools: usize,
        tools: Vec<ToolDescriptor>,
        system_summary: SystemSummary,
    },
    Error {
        error: String,
        message: String,
    },
}

/// Handler for GET /gemini/mcp-status
///
/// Probes a fresh gateway and closes it again.
pub async fn mcp_status(State(state): State<AppState>) -> Json<McpStatusResponse> {
    let gateway = state.backend.tool_gateway();

    let response = if gateway.is_connected().await {
        let tools = gateway.list_tools().await;
        let context = gateway.get_system_context().await;
        McpStatusResponse::Connected {
            framework: FRAMEWORK.to_string(),
            available_tools: tools.len(),
            tools,
            system_summary: context.total_counts.into(),
        }
    } else {
        warn!(command = %state.config.mcp.command, "MCP server unreachable");
        McpStatusResponse::Error {
            error: format!("could not start '{}'", state.config.mcp.command),
            message: "Could not connect to MCP server".to_string(),
        }
    };

    gateway.close().await;
    Json(response)
}
