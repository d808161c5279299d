//! Cached view of the store backend's entity collections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tools that read a whole collection.
pub const CONTEXT_LOADING_TOOLS: [&str; 3] = ["get_all_stores", "get_all_main_stores", "get_all_orders"];

/// Tools that write to the backend.
pub const DATA_MODIFYING_TOOLS: [&str; 9] = [
    "create_store",
    "update_store",
    "delete_store",
    "create_main_store",
    "update_main_store",
    "delete_main_store",
    "create_order",
    "update_order",
    "delete_order",
];

/// Every operation the backend tool set supports, reads first.
pub fn available_operations() -> Vec<String> {
    CONTEXT_LOADING_TOOLS
        .iter()
        .chain(DATA_MODIFYING_TOOLS.iter())
        .map(|s| s.to_string())
        .collect()
}

pub fn is_context_loading_tool(name: &str) -> bool {
    CONTEXT_LOADING_TOOLS.contains(&name)
}

pub fn is_data_modifying_tool(name: &str) -> bool {
    DATA_MODIFYING_TOOLS.contains(&name)
}

/// The three tracked collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCollection {
    Stores,
    MainStores,
    Orders,
}

impl EntityCollection {
    pub const ALL: [EntityCollection; 3] = [
        EntityCollection::Stores,
        EntityCollection::MainStores,
        EntityCollection::Orders,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EntityCollection::Stores => "stores",
            EntityCollection::MainStores => "main_stores",
            EntityCollection::Orders => "orders",
        }
    }

    /// Tool that lists the whole collection.
    pub fn list_tool(self) -> &'static str {
        match self {
            EntityCollection::Stores => "get_all_stores",
            EntityCollection::MainStores => "get_all_main_stores",
            EntityCollection::Orders => "get_all_orders",
        }
    }

    /// Key holding the entity array inside the list tool's payload.
    ///
    /// The main-store listing reuses the `stores` key.
    pub fn payload_key(self) -> &'static str {
        match self {
            EntityCollection::Stores | EntityCollection::MainStores => "stores",
            EntityCollection::Orders => "orders",
        }
    }
}

/// Per-collection entity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalCounts {
    pub stores: usize,
    pub main_stores: usize,
    pub orders: usize,
}

/// Snapshot of backend state used to ground prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemContext {
    pub stores: Vec<Value>,
    pub main_stores: Vec<Value>,
    pub orders: Vec<Value>,
    pub total_counts: TotalCounts,
    pub context_loaded: bool,
    pub available_operations: Vec<String>,
}

impl Default for SystemContext {
    /// The unloaded skeleton: empty collections plus the operation list.
    fn default() -> Self {
        Self {
            stores: Vec::new(),
            main_stores: Vec::new(),
            orders: Vec::new(),
            total_counts: TotalCounts::default(),
            context_loaded: false,
            available_operations: available_operations(),
        }
    }
}

impl SystemContext {
    pub fn collection(&self, collection: EntityCollection) -> &[Value] {
        match collection {
            EntityCollection::Stores => &self.stores,
            EntityCollection::MainStores => &self.main_stores,
            EntityCollection::Orders => &self.orders,
        }
    }

    /// Replace a collection and keep its count in step.
    pub fn set_collection(&mut self, collection: EntityCollection, entities: Vec<Value>) {
        let count = entities.len();
        match collection {
            EntityCollection::Stores => {
                self.stores = entities;
                self.total_counts.stores = count;
            }
            EntityCollection::MainStores => {
                self.main_stores = entities;
                self.total_counts.main_stores = count;
            }
            EntityCollection::Orders => {
                self.orders = entities;
                self.total_counts.orders = count;
            }
        }
    }
}

/// Pull a collection out of a list tool's result envelope.
///
/// The envelope is `{content: [{text: "<json>"}]}`. `None` when the envelope
/// or the embedded JSON is unusable; an absent payload key is an empty list.
pub fn parse_collection_payload(result: &Value, collection: EntityCollection) -> Option<Vec<Value>> {
    let text = result.get("content")?.as_array()?.first()?.get("text")?.as_str()?;
    let data: Value = serde_json::from_str(text).ok()?;
    match data.as_object()?.get(collection.payload_key()) {
        None => Some(Vec::new()),
        Some(Value::Array(entities)) => Some(entities.clone()),
        Some(_) => None,
    }
}
