use tracing::{debug, trace};

use super::CompiledGraph;
use crate::error::{GraphError, Result};
use crate::graph::{Edge, END};

impl<S: Send + 'static> CompiledGraph<S> {
    /// Run the graph to completion and return the final state.
    pub async fn invoke(&self, input: S) -> Result<S> {
        let mut current = self
            .entry()
            .cloned()
            .ok_or_else(|| GraphError::Validation("no entry point set".into()))?;
        let mut state = input;
        let mut steps = 0usize;

        while current != END {
            if steps >= self.recursion_limit {
                return Err(GraphError::RecursionLimit(self.recursion_limit));
            }
            steps += 1;

            let executor = self
                .node(&current)
                .cloned()
                .ok_or_else(|| GraphError::Execution(format!("node '{}' not found", current)))?;

            trace!(node = %current, step = steps, "running node");
            state = executor(state)
                .await
                .map_err(|e| GraphError::in_node(current.clone(), e))?;

            let next = self.next_node(&current, &state)?;
            debug!(from = %current, to = %next, "transition");
            current = next;
        }

        Ok(state)
    }

    fn next_node(&self, from: &str, state: &S) -> Result<String> {
        match self.edge(from) {
            Some(Edge::Direct(to)) => Ok(to.clone()),
            Some(Edge::Conditional { router, branches }) => {
                let branch = router(state);
                branches
                    .get(&branch)
                    .cloned()
                    .ok_or_else(|| GraphError::UnknownBranch {
                        node: from.to_string(),
                        branch,
                    })
            }
            None => Err(GraphError::Execution(format!(
                "node '{}' has no outgoing edge",
                from
            ))),
        }
    }
}
