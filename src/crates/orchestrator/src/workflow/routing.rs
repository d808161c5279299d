//! Branch decisions for the two conditional edges.

use super::parser::{COMPLETE_MARKER, EXECUTE_MARKER};
use super::state::WorkflowState;

/// Outcome of the routing after `analyze_and_plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanDecision {
    Execute,
    Finish,
}

impl PlanDecision {
    pub const EXECUTE: &'static str = "execute";
    pub const FINISH: &'static str = "finish";

    pub fn as_str(self) -> &'static str {
        match self {
            PlanDecision::Execute => Self::EXECUTE,
            PlanDecision::Finish => Self::FINISH,
        }
    }
}

/// Outcome of the routing after `update_context`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueDecision {
    Continue,
    Finish,
}

impl ContinueDecision {
    pub const CONTINUE: &'static str = "continue";
    pub const FINISH: &'static str = "finish";

    pub fn as_str(self) -> &'static str {
        match self {
            ContinueDecision::Continue => Self::CONTINUE,
            ContinueDecision::Finish => Self::FINISH,
        }
    }
}

/// Execute unless the budget is spent or the reply says `COMPLETE:`.
///
/// `EXECUTE:` is checked before `COMPLETE:`, and a reply carrying neither
/// marker still routes to execution.
pub fn should_execute_tool(state: &WorkflowState) -> PlanDecision {
    if state.budget_exhausted() {
        return PlanDecision::Finish;
    }
    let reply = state.last_message_text();
    if reply.contains(EXECUTE_MARKER) {
        PlanDecision::Execute
    } else if reply.contains(COMPLETE_MARKER) {
        PlanDecision::Finish
    } else {
        PlanDecision::Execute
    }
}

/// Loop again only while the newest execution succeeded and budget remains.
pub fn should_continue(state: &WorkflowState) -> ContinueDecision {
    if state.budget_exhausted() {
        return ContinueDecision::Finish;
    }
    match state.last_execution() {
        Some(record) if record.success => ContinueDecision::Continue,
        _ => ContinueDecision::Finish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::state::ExecutedToolRecord;
    use langgraph_core::Message;
    use serde_json::json;

    fn state_with_reply(reply: &str, iteration: u32, max: u32) -> WorkflowState {
        let mut state = WorkflowState::new("s", "req", max, vec![]);
        state.iteration = iteration;
        state.push_message(Message::assistant(reply));
        state
    }

    #[test]
    fn plan_routing() {
        assert_eq!(should_execute_tool(&state_with_reply("EXECUTE: a({})", 1, 3)), PlanDecision::Execute);
        assert_eq!(should_execute_tool(&state_with_reply("COMPLETE: done", 1, 3)), PlanDecision::Finish);
        assert_eq!(
            should_execute_tool(&state_with_reply("COMPLETE: no\nEXECUTE: a({})", 1, 3)),
            PlanDecision::Execute
        );
        // No marker at all still executes.
        assert_eq!(should_execute_tool(&state_with_reply("thinking...", 1, 3)), PlanDecision::Execute);
        // Budget wins over content.
        assert_eq!(should_execute_tool(&state_with_reply("EXECUTE: a({})", 3, 3)), PlanDecision::Finish);
    }

    #[test]
    fn continue_routing() {
        let mut state = WorkflowState::new("s", "req", 5, vec![]);
        state.iteration = 1;
        assert_eq!(should_continue(&state), ContinueDecision::Finish);

        state
            .executed_tools
            .push(ExecutedToolRecord::new(1, "get_all_stores", json!({}), "{}".into()));
        assert_eq!(should_continue(&state), ContinueDecision::Continue);

        state
            .executed_tools
            .push(ExecutedToolRecord::new(1, "create_store", json!({}), r#"{"error":"x"}"#.into()));
        assert_eq!(should_continue(&state), ContinueDecision::Finish);

        state.executed_tools.pop();
        state.iteration = 5;
        assert_eq!(should_continue(&state), ContinueDecision::Finish);
    }

    #[test]
    fn branch_keys() {
        assert_eq!(PlanDecision::Execute.as_str(), "execute");
        assert_eq!(ContinueDecision::Continue.as_str(), "continue");
        assert_eq!(ContinueDecision::Finish.as_str(), PlanDecision::Finish.as_str());
    }
}
