//! Tool Gateway
//!
//! The gateway is the workflow's only route to backend operations. It
//! discovers the tool catalog, runs tools by name and builds the context
//! snapshot from the three list-all tools.
//!
//! ```text
//!  workflow ──▶ ToolGateway ──▶ McpClient ──stdin──▶ tool provider process
//!                                         ◀─stdout──
//! ```
//!
//! Nothing here raises into the workflow: catalog failures yield an empty
//! list and call failures yield a result object with an `error` member.

mod client;
mod context;
mod error;
pub mod protocol;

use async_trait::async_trait;
use langgraph_core::ToolDescriptor;
use serde_json::{json, Value};
use tracing::debug;

pub use client::{McpClient, McpServerConfig, API_BASE_URL_ENV};
pub use context::{
    available_operations, is_context_loading_tool, is_data_modifying_tool,
    parse_collection_payload, EntityCollection, SystemContext, TotalCounts,
    CONTEXT_LOADING_TOOLS, DATA_MODIFYING_TOOLS,
};
pub use error::ToolProtocolError;

/// Access to the backend tool catalog.
#[async_trait]
pub trait ToolGateway: Send + Sync {
    /// Discover available tools. Empty on failure.
    async fn list_tools(&self) -> Vec<ToolDescriptor>;

    /// Run a tool. Failures come back as `{"error": "..."}`.
    async fn call_tool(&self, name: &str, arguments: Value) -> Value;

    /// Cheap unloaded snapshot; no round trip.
    async fn get_system_context(&self) -> SystemContext {
        SystemContext::default()
    }

    /// Fresh snapshot populated from the three list-all tools.
    async fn get_full_system_context(&self) -> SystemContext {
        let mut context = self.get_system_context().await;
        self.refresh_system_context(&mut context).await;
        context
    }

    /// Reload each collection into `context` in place.
    ///
    /// A collection whose payload cannot be parsed keeps its current value.
    /// `context_loaded` is set either way.
    async fn refresh_system_context(&self, context: &mut SystemContext) {
        for collection in EntityCollection::ALL {
            let result = self.call_tool(collection.list_tool(), json!({})).await;
            match parse_collection_payload(&result, collection) {
                Some(entities) => context.set_collection(collection, entities),
                None => debug!(
                    collection = collection.name(),
                    "unusable list payload; keeping previous value"
                ),
            }
        }
        context.context_loaded = true;
    }

    /// Whether the backing provider is reachable.
    async fn is_connected(&self) -> bool {
        true
    }

    /// Release the provider. Idempotent.
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Gateway answering list calls from a fixed table.
    struct Canned {
        results: HashMap<&'static str, Value>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ToolGateway for Canned {
        async fn list_tools(&self) -> Vec<ToolDescriptor> {
            Vec::new()
        }

        async fn call_tool(&self, name: &str, _arguments: Value) -> Value {
            self.calls.lock().unwrap().push(name.to_string());
            self.results
                .get(name)
                .cloned()
                .unwrap_or_else(|| json!({"error": "unknown tool"}))
        }
    }

    fn text(payload: Value) -> Value {
        json!({"content": [{"type": "text", "text": payload.to_string()}]})
    }

    #[tokio::test]
    async fn full_context_reads_all_three_collections() {
        let gateway = Canned {
            results: HashMap::from([
                ("get_all_stores", text(json!({"stores": [{"id": "s1"}, {"id": "s2"}]}))),
                ("get_all_main_stores", text(json!({"stores": [{"id": "m1"}]}))),
                ("get_all_orders", text(json!({"orders": []}))),
            ]),
            calls: Mutex::new(Vec::new()),
        };

        let ctx = gateway.get_full_system_context().await;
        assert!(ctx.context_loaded);
        assert_eq!(ctx.total_counts, TotalCounts { stores: 2, main_stores: 1, orders: 0 });
        assert_eq!(
            *gateway.calls.lock().unwrap(),
            vec!["get_all_stores", "get_all_main_stores", "get_all_orders"]
        );
    }

    #[tokio::test]
    async fn malformed_collection_keeps_prior_value() {
        let gateway = Canned {
            results: HashMap::from([
                ("get_all_stores", text(json!({"stores": [{"id": "fresh"}]}))),
                (
                    "get_all_main_stores",
                    json!({"content": [{"type": "text", "text": "{not json"}]}),
                ),
                ("get_all_orders", text(json!({"orders": [{"id": "o1"}]}))),
            ]),
            calls: Mutex::new(Vec::new()),
        };

        let mut ctx = SystemContext::default();
        ctx.set_collection(EntityCollection::MainStores, vec![json!({"id": "old"})]);

        gateway.refresh_system_context(&mut ctx).await;

        assert!(ctx.context_loaded);
        assert_eq!(ctx.main_stores, vec![json!({"id": "old"})]);
        assert_eq!(ctx.total_counts.main_stores, 1);
        assert_eq!(ctx.stores, vec![json!({"id": "fresh"})]);
        assert_eq!(ctx.total_counts.orders, 1);
    }

    #[tokio::test]
    async fn error_results_leave_skeleton_but_mark_loaded() {
        let gateway = Canned {
            results: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        };
        let ctx = gateway.get_full_system_context().await;
        assert!(ctx.context_loaded);
        assert_eq!(ctx.total_counts, TotalCounts::default());
    }
}
