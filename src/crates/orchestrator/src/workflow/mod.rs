//! Feedback loop workflow
//!
//! One run takes a natural-language request, asks the model for the next
//! action, executes at most one tool per iteration, refreshes the cached
//! system context when a tool touched it, and stops when the model declares
//! the request complete, a tool fails, or the iteration budget runs out.
//!
//! - [`state`] - the record threaded through the graph
//! - [`events`] - the client-facing event contract
//! - [`prompts`] - analysis and summary prompts
//! - [`parser`] - `EXECUTE:` line extraction
//! - [`routing`] - conditional edge decisions
//! - [`executor`] - graph assembly and the run entry point
//! - [`backend`] - model and gateway factories

pub mod backend;
pub mod events;
pub mod executor;
pub mod parser;
pub mod prompts;
pub mod routing;
pub mod state;

pub use backend::{LiveBackend, WorkflowBackend};
pub use events::{result_payload, FinalState, WorkflowEvent, FRAMEWORK};
pub use executor::FeedbackLoopExecutor;
pub use parser::{extract_tool_call, COMPLETE_MARKER, EXECUTE_MARKER};
pub use routing::{should_continue, should_execute_tool, ContinueDecision, PlanDecision};
pub use state::{looks_successful, ExecutedToolRecord, ToolCallRequest, WorkflowState, RECENT_EXECUTIONS};
