//! API request handlers

pub mod health;
pub mod status;

pub use health::{health, HealthResponse, SERVICE_NAME};
pub use status::{mcp_status, McpStatusResponse, SystemSummary};
