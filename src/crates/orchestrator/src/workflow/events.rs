//! Events streamed to the client during a session.
//!
//! Every event serializes to a JSON object with a `type` discriminator. A
//! `timestamp` is stamped on at send time by [`WorkflowEvent::to_message`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tooling::gateway::{SystemContext, TotalCounts};

use super::state::ExecutedToolRecord;

/// Framework label reported in the start event and the status endpoint.
pub const FRAMEWORK: &str = "LangGraph with proper tool management";

/// Snapshot sent with the completion event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalState {
    pub system_context: SystemContext,
    pub executed_tools: Vec<ExecutedToolRecord>,
}

/// Server to client event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowEvent {
    Connection {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<String>,
        message: String,
    },

    #[serde(rename = "langgraph_workflow_start")]
    WorkflowStart {
        initial_request: String,
        max_iterations: u32,
        framework: String,
    },

    WorkflowNode {
        node: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iteration: Option<u32>,
        message: String,
    },

    SystemContext {
        available_tools: usize,
        system_summary: TotalCounts,
    },

    IterationStart {
        iteration: u32,
        max_iterations: u32,
    },

    GeminiAnalysis {
        iteration: u32,
        analysis: String,
    },

    ToolExecutionStart {
        iteration: u32,
        tool_name: String,
        arguments: Value,
    },

    ToolExecutionResult {
        iteration: u32,
        tool_name: String,
        arguments: Value,
        success: bool,
        /// Parsed JSON when the raw text is an object, the raw text otherwise.
        result: Value,
    },

    SystemUpdate {
        iteration: u32,
        reason: String,
        updated_context: TotalCounts,
    },

    ContextUpdateSkipped {
        iteration: u32,
        reason: String,
    },

    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iteration: Option<u32>,
        message: String,
    },

    FeedbackLoopComplete {
        total_iterations: u32,
        tools_executed: usize,
        successful_tools: usize,
        summary: String,
    },

    #[serde(rename = "langgraph_workflow_complete")]
    WorkflowComplete {
        total_iterations: u32,
        tools_executed: usize,
        successful_tools: usize,
        final_state: FinalState,
    },
}

impl WorkflowEvent {
    /// Greeting sent when a session registers.
    pub fn connected(session_id: impl Into<String>) -> Self {
        WorkflowEvent::Connection {
            status: Some("connected".to_string()),
            session_id: Some(session_id.into()),
            message: "WebSocket connection established".to_string(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        WorkflowEvent::Connection {
            status: None,
            session_id: None,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        WorkflowEvent::Error {
            iteration: None,
            message: message.into(),
        }
    }

    pub fn node_error(iteration: u32, message: impl Into<String>) -> Self {
        WorkflowEvent::Error {
            iteration: Some(iteration),
            message: message.into(),
        }
    }

    pub fn node(node: &str, iteration: Option<u32>, message: &str) -> Self {
        WorkflowEvent::WorkflowNode {
            node: node.to_string(),
            iteration,
            message: message.to_string(),
        }
    }

    /// Wire name of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowEvent::Connection { .. } => "connection",
            WorkflowEvent::WorkflowStart { .. } => "langgraph_workflow_start",
            WorkflowEvent::WorkflowNode { .. } => "workflow_node",
            WorkflowEvent::SystemContext { .. } => "system_context",
            WorkflowEvent::IterationStart { .. } => "iteration_start",
            WorkflowEvent::GeminiAnalysis { .. } => "gemini_analysis",
            WorkflowEvent::ToolExecutionStart { .. } => "tool_execution_start",
            WorkflowEvent::ToolExecutionResult { .. } => "tool_execution_result",
            WorkflowEvent::SystemUpdate { .. } => "system_update",
            WorkflowEvent::ContextUpdateSkipped { .. } => "context_update_skipped",
            WorkflowEvent::Error { .. } => "error",
            WorkflowEvent::FeedbackLoopComplete { .. } => "feedback_loop_complete",
            WorkflowEvent::WorkflowComplete { .. } => "langgraph_workflow_complete",
        }
    }

    /// Serialize with a `timestamp` field added.
    pub fn to_message(&self) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(fields) = &mut value {
            fields.insert("timestamp".to_string(), Value::String(Utc::now().to_rfc3339()));
        }
        serde_json::to_string(&value)
    }
}

/// Shape a raw tool result for the result event.
///
/// Text that starts with `{` is sent as parsed JSON; if it does not parse it
/// goes out as a plain string like any other text.
pub fn result_payload(raw: &str) -> Value {
    if raw.starts_with('{') {
        if let Ok(parsed) = serde_json::from_str::<Value>(raw) {
            return parsed;
        }
    }
    Value::String(raw.to_string())
}
