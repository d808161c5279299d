//! Prompt builders for the analysis and summary model calls.

use serde::Serialize;

use super::state::{WorkflowState, RECENT_EXECUTIONS};

const CONTEXT_NOT_LOADED: &str = "SYSTEM CONTEXT: Not loaded yet. Use get_all_stores, get_all_main_stores, or get_all_orders tools if you need current data.";

const INSTRUCTIONS: [&str; 9] = [
    "INSTRUCTIONS:",
    "1. Analyze the current request",
    "2. If you need current system data, first call get_all_stores, get_all_main_stores, or get_all_orders",
    "3. If you need to execute a tool, respond with exactly ONE tool call:",
    r#"   EXECUTE: tool_name({"param1": "value1", "param2": "value2"})"#,
    "4. If no more tools are needed, respond with 'COMPLETE: [explanation]'",
    "5. Always explain your reasoning before the tool call",
    "6. Don't assume system state - call tools to get current data when needed",
    "",
];

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Prompt asking the model for the next single action.
pub fn analysis_prompt(state: &WorkflowState) -> String {
    let mut lines: Vec<String> = vec![
        format!("ITERATION {} - MCP STORE MANAGEMENT", state.iteration),
        String::new(),
        "You are executing store management operations.".into(),
        "Analyze the current request and decide the next action.".into(),
        String::new(),
        "AVAILABLE MCP TOOLS:".into(),
    ];

    lines.extend(
        state
            .available_tools
            .iter()
            .map(|tool| format!("- {}: {}", tool.name, tool.description)),
    );

    if state.system_context.context_loaded {
        lines.push(String::new());
        lines.push("CURRENT SYSTEM STATE:".into());
        lines.push(pretty(&state.system_context));
        lines.push(String::new());
    } else {
        lines.push(String::new());
        lines.push(CONTEXT_NOT_LOADED.into());
        lines.push(format!(
            "Available operations: {}",
            state.system_context.available_operations.join(", ")
        ));
        lines.push(String::new());
    }

    let recent = state.recent_executions(RECENT_EXECUTIONS);
    if !recent.is_empty() {
        lines.push("PREVIOUSLY EXECUTED TOOLS:".into());
        lines.push(pretty(&recent));
        lines.push(String::new());
    }

    lines.push(format!("CURRENT REQUEST: {}", state.current_request));
    lines.push(String::new());
    lines.extend(INSTRUCTIONS.iter().map(|s| s.to_string()));
    lines.push("Your response:".into());

    lines.join("\n")
}

/// Prompt asking the model to summarize the finished run.
pub fn summary_prompt(state: &WorkflowState) -> String {
    format!(
        "Please provide a comprehensive summary of the LangGraph MCP workflow execution.

INITIAL REQUEST: {request}

EXECUTED TOOLS:
{tools}

FINAL SYSTEM STATE:
{context}

Please summarize:
1. What was accomplished using LangGraph workflow
2. Which operations succeeded/failed and why
3. The overall outcome
4. System state changes

Be concise but comprehensive.",
        request = state.current_request,
        tools = pretty(&state.executed_tools),
        context = pretty(&state.system_context),
    )
}
