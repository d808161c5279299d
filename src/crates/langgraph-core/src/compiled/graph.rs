use crate::graph::{Edge, Graph, NodeExecutor, NodeId};

/// Default number of node steps an invocation may take.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// A validated, executable graph.
pub struct CompiledGraph<S> {
    pub(super) graph: Graph<S>,
    pub(super) recursion_limit: usize,
}

impl<S> CompiledGraph<S> {
    pub(crate) fn new(graph: Graph<S>) -> Self {
        Self {
            graph,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    /// Cap the number of node executions per invocation.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit.max(1);
        self
    }

    pub fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }

    /// Node names, sorted.
    pub fn node_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.graph.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn entry_point(&self) -> Option<&str> {
        self.graph.entry.as_deref()
    }

    pub(super) fn node(&self, id: &str) -> Option<&NodeExecutor<S>> {
        self.graph.nodes.get(id)
    }

    pub(super) fn edge(&self, id: &str) -> Option<&Edge<S>> {
        self.graph.edges.get(id)
    }

    pub(super) fn entry(&self) -> Option<&NodeId> {
        self.graph.entry.as_ref()
    }
}
