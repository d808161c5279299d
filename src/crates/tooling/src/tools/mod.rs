//! Tool adapters
//!
//! Wrap gateway tool descriptors as [`Tool`](langgraph_core::Tool)s so the
//! workflow can call them uniformly through a
//! [`ToolRegistry`](langgraph_core::ToolRegistry).

mod mcp_tool;

pub use mcp_tool::{load_tools, McpTool};
