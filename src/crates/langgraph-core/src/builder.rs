//! StateGraph builder API
//!
//! [`StateGraph`] is the entry point for assembling a workflow. Nodes are async
//! functions over a typed state; edges wire them together; `compile()` checks
//! the wiring and produces a runnable [`CompiledGraph`].
//!
//! # Example
//!
//! ```rust
//! use langgraph_core::{StateGraph, END, START};
//!
//! # async fn run() -> langgraph_core::Result<()> {
//! let mut graph = StateGraph::<u32>::new();
//!
//! graph.add_node("bump", |n: u32| Box::pin(async move { Ok(n + 1) }));
//! graph.add_node("done", |n: u32| Box::pin(async move { Ok(n) }));
//!
//! graph.add_edge(START, "bump");
//! graph.add_conditional_edges(
//!     "bump",
//!     |n: &u32| if *n < 3 { "again".into() } else { "stop".into() },
//!     [("again", "bump"), ("stop", "done")],
//! );
//! graph.add_edge("done", END);
//!
//! let compiled = graph.compile()?;
//! assert_eq!(compiled.invoke(0).await?, 3);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::compiled::CompiledGraph;
use crate::error::{GraphError, Result};
use crate::graph::{Edge, Graph, NodeExecutor, NodeId, START};

/// Builder for typed state graphs.
pub struct StateGraph<S> {
    graph: Graph<S>,
    errors: Vec<String>,
}

impl<S> Default for StateGraph<S> {
    fn default() -> Self {
        Self {
            graph: Graph::new(),
            errors: Vec::new(),
        }
    }
}

impl<S: Send + 'static> StateGraph<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node.
    ///
    /// The executor receives the state by value and returns the updated state.
    /// Re-adding an existing name replaces the executor.
    pub fn add_node<F, Fut>(&mut self, id: impl Into<NodeId>, executor: F) -> &mut Self
    where
        F: Fn(S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S>> + Send + 'static,
    {
        let id = id.into();
        if id == START || id == crate::graph::END {
            self.errors.push(format!("'{}' is a reserved node name", id));
            return self;
        }
        let executor: NodeExecutor<S> = Arc::new(move |state| Box::pin(executor(state)));
        self.graph.nodes.insert(id, executor);
        self
    }

    /// Add an unconditional edge. An edge from [`START`] sets the entry point.
    pub fn add_edge(&mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> &mut Self {
        let (from, to) = (from.into(), to.into());
        if from == START {
            self.graph.entry = Some(to);
            return self;
        }
        self.insert_edge(from, Edge::Direct(to));
        self
    }

    /// Add a conditional edge.
    ///
    /// `router` maps the state to a branch key; `branches` maps each key to the
    /// node (or `END`) to run next.
    pub fn add_conditional_edges<F, I, K, V>(
        &mut self,
        from: impl Into<NodeId>,
        router: F,
        branches: I,
    ) -> &mut Self
    where
        F: Fn(&S) -> String + Send + Sync + 'static,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<NodeId>,
    {
        let branches: HashMap<String, NodeId> = branches
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.insert_edge(
            from.into(),
            Edge::Conditional {
                router: Arc::new(router),
                branches,
            },
        );
        self
    }

    /// Set the entry point. Same as `add_edge(START, node)`.
    pub fn set_entry_point(&mut self, node: impl Into<NodeId>) -> &mut Self {
        self.graph.entry = Some(node.into());
        self
    }

    /// Validate the wiring and freeze the graph.
    pub fn compile(self) -> Result<CompiledGraph<S>> {
        if let Some(first) = self.errors.into_iter().next() {
            return Err(GraphError::Validation(first));
        }
        self.graph.validate().map_err(GraphError::Validation)?;
        Ok(CompiledGraph::new(self.graph))
    }

    fn insert_edge(&mut self, from: NodeId, edge: Edge<S>) {
        if self.graph.edges.contains_key(&from) {
            self.errors
                .push(format!("node '{}' already has an outgoing edge", from));
            return;
        }
        self.graph.edges.insert(from, edge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::END;

    fn passthrough(graph: &mut StateGraph<i32>, name: &str) {
        graph.add_node(name, |s: i32| async move { Ok(s) });
    }

    #[test]
    fn compile_requires_entry_point() {
        let mut graph = StateGraph::<i32>::new();
        passthrough(&mut graph, "a");
        graph.add_edge("a", END);

        let err = graph.compile().err().unwrap();
        assert!(err.to_string().contains("no entry point"));
    }

    #[test]
    fn compile_rejects_unknown_targets() {
        let mut graph = StateGraph::<i32>::new();
        passthrough(&mut graph, "a");
        graph.add_edge(START, "a");
        graph.add_conditional_edges("a", |_| "x".into(), [("x", "missing")]);

        let err = graph.compile().err().unwrap();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn compile_rejects_dangling_node() {
        let mut graph = StateGraph::<i32>::new();
        passthrough(&mut graph, "a");
        passthrough(&mut graph, "b");
        graph.add_edge(START, "a");
        graph.add_edge("a", END);

        let err = graph.compile().err().unwrap();
        assert!(err.to_string().contains("'b' has no outgoing edge"));
    }

    #[test]
    fn compile_rejects_second_outgoing_edge() {
        let mut graph = StateGraph::<i32>::new();
        passthrough(&mut graph, "a");
        graph.add_edge(START, "a");
        graph.add_edge("a", END);
        graph.add_edge("a", "a");

        assert!(matches!(graph.compile(), Err(GraphError::Validation(_))));
    }

    #[test]
    fn reserved_names_are_rejected() {
        let mut graph = StateGraph::<i32>::new();
        passthrough(&mut graph, END);
        assert!(graph.compile().is_err());
    }
}
