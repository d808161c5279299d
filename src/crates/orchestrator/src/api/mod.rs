//! HTTP and WebSocket surface
//!
//! - `GET /health` - liveness plus the open session count
//! - `GET /gemini/mcp-status` - probe the MCP tool provider
//! - `GET /gemini/ws/feedback-loop` - the feedback-loop session socket

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod ws;

pub use middleware::cors_layer;
pub use routes::{create_router, AppState};
