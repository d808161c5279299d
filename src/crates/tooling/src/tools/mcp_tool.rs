use std::sync::Arc;

use async_trait::async_trait;
use langgraph_core::{Tool, ToolDescriptor, ToolRegistry, ToolResult};
use serde_json::Value;
use tracing::{debug, warn};

use crate::gateway::ToolGateway;
use crate::logging::timed;

/// One gateway tool exposed through the [`Tool`] trait.
pub struct McpTool {
    descriptor: ToolDescriptor,
    gateway: Arc<dyn ToolGateway>,
}

impl McpTool {
    pub fn new(descriptor: ToolDescriptor, gateway: Arc<dyn ToolGateway>) -> Self {
        Self { descriptor, gateway }
    }
}

#[async_trait]
impl Tool for McpTool {
    fn name(&self) -> &str {
        &self.descriptor.name
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    /// Returns the gateway result serialized as JSON text, or
    /// `Error executing {name}: {e}` when it cannot be serialized.
    async fn invoke(&self, arguments: Value) -> ToolResult {
        let name = self.name();
        let result = timed(name, self.gateway.call_tool(name, arguments)).await;
        match serde_json::to_string(&result) {
            Ok(text) => Ok(text),
            Err(e) => Ok(format!("Error executing {}: {}", name, e)),
        }
    }

    fn descriptor(&self) -> ToolDescriptor {
        self.descriptor.clone()
    }
}

/// Discover the gateway's catalog and wrap every tool.
///
/// Duplicate names keep their first descriptor.
pub async fn load_tools(gateway: Arc<dyn ToolGateway>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for descriptor in gateway.list_tools().await {
        let name = descriptor.name.clone();
        if !registry.register(Arc::new(McpTool::new(descriptor, Arc::clone(&gateway)))) {
            warn!(tool = %name, "duplicate tool name in catalog; ignoring");
        }
    }
    debug!(count = registry.len(), "loaded tools");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct Recording {
        calls: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl ToolGateway for Recording {
        async fn list_tools(&self) -> Vec<ToolDescriptor> {
            vec![
                ToolDescriptor::new("get_all_stores", "List every store"),
                ToolDescriptor::new("create_store", "Create a store"),
                ToolDescriptor::new("get_all_stores", "Shadowed duplicate"),
            ]
        }

        async fn call_tool(&self, name: &str, arguments: Value) -> Value {
            self.calls.lock().unwrap().push((name.to_string(), arguments.clone()));
            if name == "create_store" {
                json!({"error": "Invalid store data"})
            } else {
                json!({"content": [{"type": "text", "text": "{\"stores\":[]}"}]})
            }
        }
    }

    #[tokio::test]
    async fn load_tools_wraps_catalog_in_order() {
        let gateway = Arc::new(Recording { calls: Mutex::new(Vec::new()) });
        let registry = load_tools(gateway).await;

        assert_eq!(registry.tool_names(), vec!["get_all_stores", "create_store"]);
        assert_eq!(registry.descriptors()[0].description, "List every store");
    }

    #[tokio::test]
    async fn invoke_forwards_arguments_and_serializes_result() {
        let gateway = Arc::new(Recording { calls: Mutex::new(Vec::new()) });
        let tool = McpTool::new(
            ToolDescriptor::new("create_store", "Create a store"),
            gateway.clone(),
        );

        let out = tool.invoke(json!({"name": "Downtown"})).await.unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({"error": "Invalid store data"}));

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls[0], ("create_store".to_string(), json!({"name": "Downtown"})));
    }
}
