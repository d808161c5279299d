//! State threaded through one feedback-loop run.

use chrono::{DateTime, Utc};
use langgraph_core::{Message, ToolDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tooling::gateway::SystemContext;

/// How many executed-tool records the analysis prompt replays.
pub const RECENT_EXECUTIONS: usize = 3;

/// One tool invocation, recorded after it ran. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedToolRecord {
    pub iteration: u32,
    pub tool_name: String,
    pub arguments: Value,
    /// Raw text the tool returned.
    pub result: String,
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

impl ExecutedToolRecord {
    /// Record a result, classifying it with [`looks_successful`].
    pub fn new(iteration: u32, tool_name: impl Into<String>, arguments: Value, result: String) -> Self {
        let success = looks_successful(&result);
        Self {
            iteration,
            tool_name: tool_name.into(),
            arguments,
            result,
            success,
            timestamp: Utc::now(),
        }
    }
}

/// A result counts as a success unless its text mentions "error" in any case.
///
/// This is a substring test: a successful payload that names an
/// "Error Code Scanner" is classified as a failure.
pub fn looks_successful(result: &str) -> bool {
    !result.to_lowercase().contains("error")
}

/// A tool call parsed out of the model's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    pub tool_name: String,
    /// Always a JSON object.
    pub arguments: Value,
}

/// Mutable record every workflow node receives and returns.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub session_id: String,
    pub messages: Vec<Message>,
    pub system_context: SystemContext,
    /// Discovered at run start; fixed for the run.
    pub available_tools: Vec<ToolDescriptor>,
    pub current_request: String,
    pub iteration: u32,
    pub max_iterations: u32,
    pub executed_tools: Vec<ExecutedToolRecord>,
}

impl WorkflowState {
    pub fn new(
        session_id: impl Into<String>,
        request: impl Into<String>,
        max_iterations: u32,
        available_tools: Vec<ToolDescriptor>,
    ) -> Self {
        let request = request.into();
        Self {
            session_id: session_id.into(),
            messages: vec![Message::human(request.clone())],
            system_context: SystemContext::default(),
            available_tools,
            current_request: request,
            iteration: 0,
            max_iterations,
            executed_tools: Vec::new(),
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the newest message, or `""` for an empty conversation.
    pub fn last_message_text(&self) -> &str {
        self.last_message().map(Message::text).unwrap_or("")
    }

    pub fn last_execution(&self) -> Option<&ExecutedToolRecord> {
        self.executed_tools.last()
    }

    /// The newest `n` records, oldest first.
    pub fn recent_executions(&self, n: usize) -> &[ExecutedToolRecord] {
        let start = self.executed_tools.len().saturating_sub(n);
        &self.executed_tools[start..]
    }

    pub fn successful_tools(&self) -> usize {
        self.executed_tools.iter().filter(|r| r.success).count()
    }

    pub fn budget_exhausted(&self) -> bool {
        self.iteration >= self.max_iterations
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(iteration: u32, result: &str) -> ExecutedToolRecord {
        ExecutedToolRecord::new(iteration, "get_all_stores", json!({}), result.to_string())
    }

    #[test]
    fn new_state_starts_with_the_request() {
        let state = WorkflowState::new("s1", "list all stores", 3, vec![]);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.last_message_text(), "list all stores");
        assert_eq!(state.iteration, 0);
        assert!(!state.system_context.context_loaded);
    }

    #[test]
    fn recent_executions_keeps_last_three_in_order() {
        let mut state = WorkflowState::new("s1", "req", 10, vec![]);
        for i in 1..=5 {
            state.executed_tools.push(record(i, "{}"));
        }
        let recent: Vec<u32> = state
            .recent_executions(RECENT_EXECUTIONS)
            .iter()
            .map(|r| r.iteration)
            .collect();
        assert_eq!(recent, vec![3, 4, 5]);

        state.executed_tools.truncate(2);
        assert_eq!(state.recent_executions(RECENT_EXECUTIONS).len(), 2);
    }

    #[test]
    fn success_is_a_case_insensitive_substring_test() {
        assert!(record(1, r#"{"stores": []}"#).success);
        assert!(!record(1, r#"{"error": "boom"}"#).success);
        assert!(!record(1, "Internal ERROR").success);
        // A healthy payload that happens to mention the word is still a failure.
        assert!(!record(1, r#"{"stores": [{"name": "Error Code Scanner"}]}"#).success);
    }

    #[test]
    fn budget() {
        let mut state = WorkflowState::new("s1", "req", 2, vec![]);
        assert!(!state.budget_exhausted());
        state.iteration = 2;
        assert!(state.budget_exhausted());
    }
}
