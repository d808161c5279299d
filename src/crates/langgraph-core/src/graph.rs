//! Core graph data structures
//!
//! A [`Graph`] is a set of named nodes plus, for each node, exactly one outgoing
//! [`Edge`]. Edges either point straight at the next node or hand the current
//! state to a router that picks a branch key, which is then looked up in the
//! edge's branch table.
//!
//! ```text
//!  START ──▶ initialize ──▶ analyze ──┬── "execute" ──▶ execute ──▶ update ──┬── "continue" ──▶ analyze
//!                                     └── "finish"  ──▶ finalize ──▶ END     └── "finish"   ──▶ finalize
//! ```
//!
//! Graphs are generic over their state type `S`. Nodes take the state by value
//! and hand back the next version of it, so a node never observes a partially
//! written state.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Result;

/// Unique identifier for a node.
pub type NodeId = String;

/// Virtual node marking where execution begins.
pub const START: &str = "__start__";

/// Virtual node marking successful completion.
pub const END: &str = "__end__";

/// Boxed future returned by node executors.
pub type NodeFuture<S> = Pin<Box<dyn Future<Output = Result<S>> + Send>>;

/// A node: takes the current state and produces the next one.
pub type NodeExecutor<S> = Arc<dyn Fn(S) -> NodeFuture<S> + Send + Sync>;

/// Router for a conditional edge: inspects state and names a branch.
pub type RouterFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;

/// Outgoing edge of a node.
pub enum Edge<S> {
    /// Always continue to the given node.
    Direct(NodeId),
    /// Ask the router for a branch key, then follow `branches[key]`.
    Conditional {
        router: RouterFn<S>,
        branches: HashMap<String, NodeId>,
    },
}

impl<S> Clone for Edge<S> {
    fn clone(&self) -> Self {
        match self {
            Edge::Direct(to) => Edge::Direct(to.clone()),
            Edge::Conditional { router, branches } => Edge::Conditional {
                router: Arc::clone(router),
                branches: branches.clone(),
            },
        }
    }
}

impl<S> Edge<S> {
    /// Every node this edge may lead to.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            Edge::Direct(to) => vec![to.as_str()],
            Edge::Conditional { branches, .. } => branches.values().map(String::as_str).collect(),
        }
    }
}

/// Structural graph: nodes, edges and the entry point.
pub struct Graph<S> {
    pub nodes: HashMap<NodeId, NodeExecutor<S>>,
    pub edges: HashMap<NodeId, Edge<S>>,
    pub entry: Option<NodeId>,
}

impl<S> Default for Graph<S> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
        }
    }
}

impl<S> Graph<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the graph can be executed.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let entry = self
            .entry
            .as_deref()
            .ok_or_else(|| "no entry point set".to_string())?;
        if !self.nodes.contains_key(entry) {
            return Err(format!("entry point '{}' is not a node", entry));
        }

        for (from, edge) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(format!("edge starts at unknown node '{}'", from));
            }
            if let Edge::Conditional { branches, .. } = edge {
                if branches.is_empty() {
                    return Err(format!("conditional edge from '{}' has no branches", from));
                }
            }
            for to in edge.targets() {
                if to != END && !self.nodes.contains_key(to) {
                    return Err(format!("edge '{}' -> '{}' targets unknown node", from, to));
                }
            }
        }

        let mut names: Vec<&NodeId> = self.nodes.keys().collect();
        names.sort();
        for name in names {
            if !self.edges.contains_key(name) {
                return Err(format!("node '{}' has no outgoing edge", name));
            }
        }

        Ok(())
    }
}
