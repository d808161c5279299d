//! Runtime for compiled graphs
//!
//! A [`CompiledGraph`] is an immutable, validated graph. It can be invoked any
//! number of times; each invocation walks the graph from its entry point,
//! running exactly one node at a time, until it reaches `END`.
//!
//! # Execution model
//!
//! - One node runs per step; its output state is the next node's input.
//! - After a node finishes, its outgoing edge decides the next node. For a
//!   conditional edge the router sees the state the node just produced.
//! - A step limit guards against cycles that never reach `END`.

mod execution;
mod graph;

pub use graph::{CompiledGraph, DEFAULT_RECURSION_LIMIT};
