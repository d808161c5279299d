//! # langgraph-core - Stateful workflow graphs
//!
//! Build workflows as graphs of async nodes over a typed state, with
//! conditional routing between them.
//!
//! ## Overview
//!
//! - **Typed state** - a graph is generic over the state it threads through
//!   its nodes; every node takes the state by value and returns the next one
//! - **Conditional routing** - a router inspects the state after a node and
//!   picks the next node by branch key
//! - **Step limit** - cyclic graphs are cut off after a configurable number
//!   of node executions
//! - **Model and tool seams** - the [`ChatModel`] and [`Tool`] traits let
//!   nodes call language models and dynamically discovered tools without
//!   knowing the provider behind them
//!
//! ## Quick Start
//!
//! ```rust
//! use langgraph_core::{StateGraph, END, START};
//!
//! #[derive(Clone, Default)]
//! struct Counter {
//!     hits: u32,
//! }
//!
//! # async fn run() -> langgraph_core::Result<()> {
//! let mut graph = StateGraph::new();
//! graph.add_node("hit", |mut s: Counter| async move {
//!     s.hits += 1;
//!     Ok(s)
//! });
//! graph.add_edge(START, "hit");
//! graph.add_edge("hit", END);
//!
//! let out = graph.compile()?.invoke(Counter::default()).await?;
//! assert_eq!(out.hits, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`builder`] - the [`StateGraph`] builder
//! - [`compiled`] - the [`CompiledGraph`] runtime
//! - [`graph`] - nodes, edges, `START` / `END`
//! - [`messages`] - conversation messages
//! - [`llm`] - the chat model trait and request types
//! - [`tool`] - the tool trait and registry
//! - [`error`] - [`GraphError`]

pub mod builder;
pub mod compiled;
pub mod error;
pub mod graph;
pub mod llm;
pub mod messages;
pub mod tool;

pub use builder::StateGraph;
pub use compiled::CompiledGraph;
pub use error::{GraphError, Result};
pub use graph::{NodeId, END, START};
pub use llm::{ChatConfig, ChatModel, ChatRequest, ChatResponse, UsageMetadata};
pub use messages::{Message, MessageRole};
pub use tool::{Tool, ToolDescriptor, ToolError, ToolRegistry, ToolResult};
