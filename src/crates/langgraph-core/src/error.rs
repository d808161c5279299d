//! Error types for graph construction and execution
//!
//! ```text
//! GraphError
//! ├── Validation         - Graph structure errors found by `compile()`
//! ├── NodeExecution      - A node returned an error
//! ├── UnknownBranch      - A router chose a key missing from its branch table
//! ├── RecursionLimit     - Too many steps without reaching END
//! ├── Llm                - Chat model failures surfaced through the trait
//! ├── Serialization      - JSON errors
//! └── Execution          - Anything else raised while running
//! ```
//!
//! Nodes are free to return any of these; the runtime wraps whatever a node
//! returns in [`GraphError::NodeExecution`] so the failing node is always named.

use thiserror::Error;

/// Errors raised while building or running a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// Graph structure is invalid.
    #[error("Graph validation failed: {0}")]
    Validation(String),

    /// A node failed while processing state.
    #[error("Node '{node}' failed: {error}")]
    NodeExecution {
        node: String,
        #[source]
        error: Box<GraphError>,
    },

    /// A conditional router returned a key with no registered target.
    #[error("Router for '{node}' returned unknown branch '{branch}'")]
    UnknownBranch { node: String, branch: String },

    /// The graph took more steps than allowed without reaching END.
    #[error("Recursion limit of {0} steps reached without hitting END")]
    RecursionLimit(usize),

    /// Chat model call failed.
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Execution error: {0}")]
    Execution(String),
}

impl GraphError {
    /// Wrap an error raised inside `node`.
    pub fn in_node(node: impl Into<String>, error: GraphError) -> Self {
        GraphError::NodeExecution {
            node: node.into(),
            error: Box::new(error),
        }
    }
}

/// Result type used throughout langgraph-core.
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_execution_names_the_node() {
        let err = GraphError::in_node("analyze", GraphError::Llm("quota".into()));
        assert_eq!(err.to_string(), "Node 'analyze' failed: LLM error: quota");
    }

    #[test]
    fn serde_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: GraphError = parse.unwrap_err().into();
        assert!(matches!(err, GraphError::Serialization(_)));
    }
}
