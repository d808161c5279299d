//! Tools callable from workflow nodes
//!
//! A [`Tool`] is anything with a name, a description and an async `invoke`
//! taking a JSON object of named arguments. The catalog of tools a run may use
//! is discovered at runtime, so tools are handled as `Arc<dyn Tool>` inside a
//! [`ToolRegistry`] rather than bound statically.
//!
//! ```text
//!  descriptors (name, description)
//!          │  wrap
//!          ▼
//!  ToolRegistry ── get(name) ──▶ Arc<dyn Tool> ── invoke(args) ──▶ raw text result
//! ```
//!
//! The registry preserves registration order so prompts list tools the same
//! way every time.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during tool execution
#[derive(Debug, Error, Clone, Serialize, Deserialize)]
pub enum ToolError {
    /// Tool not found in registry
    #[error("Tool '{0}' not found. Available tools: {1}")]
    ToolNotFound(String, String),

    #[error("Invalid arguments for tool '{tool}': {error}")]
    InvalidArguments { tool: String, error: String },

    #[error("Tool '{tool}' execution failed: {error}")]
    ExecutionFailed { tool: String, error: String },
}

/// Result of invoking a tool: the raw text it produced.
pub type ToolResult = std::result::Result<String, ToolError>;

/// Name and human-readable description of a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A callable operation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// Run the tool with a JSON object of named arguments.
    async fn invoke(&self, arguments: Value) -> ToolResult;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(self.name(), self.description())
    }
}

/// Insertion-ordered set of tools with unique names.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Returns `false` and keeps the existing entry when the
    /// name is already taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> bool {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        true
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up and invoke a tool by name.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResult {
        match self.get(name) {
            Some(tool) => tool.invoke(arguments).await,
            None => Err(ToolError::ToolNotFound(
                name.to_string(),
                self.tool_names().join(", "),
            )),
        }
    }
}
