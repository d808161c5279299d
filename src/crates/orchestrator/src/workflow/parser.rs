//! Tool-call extraction from model replies.
//!
//! The model is asked to answer with a line of the form
//!
//! ```text
//! EXECUTE: tool_name({"param": "value"})
//! ```
//!
//! Extraction never fails loudly: unusable arguments become `{}` and a reply
//! without a usable line yields `None`.

use serde_json::{Map, Value};
use tracing::debug;

use super::state::ToolCallRequest;

/// Marker that introduces a tool call.
pub const EXECUTE_MARKER: &str = "EXECUTE:";

/// Marker the model uses to declare the request satisfied.
pub const COMPLETE_MARKER: &str = "COMPLETE:";

/// Find the first `EXECUTE:` line carrying a parenthesised call.
///
/// Lines are trimmed before matching, so indentation is allowed but the
/// marker must start the line. The tool name is everything before the first
/// `(`; the arguments are everything between that `(` and the last `)`.
pub fn extract_tool_call(reply: &str) -> Option<ToolCallRequest> {
    reply.lines().find_map(|line| parse_line(line.trim()))
}

fn parse_line(line: &str) -> Option<ToolCallRequest> {
    let call = line.strip_prefix(EXECUTE_MARKER)?.trim();
    let open = call.find('(')?;
    let close = call.rfind(')')?;

    let tool_name = call[..open].trim().to_string();
    let params = if close > open { &call[open + 1..close] } else { "" };

    Some(ToolCallRequest {
        arguments: parse_arguments(&tool_name, params),
        tool_name,
    })
}

fn parse_arguments(tool_name: &str, params: &str) -> Value {
    if params.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(params) {
        Ok(Value::Object(args)) => Value::Object(args),
        Ok(other) => {
            debug!(tool = tool_name, kind = %json_kind(&other), "tool arguments are not an object; using {{}}");
            Value::Object(Map::new())
        }
        Err(e) => {
            debug!(tool = tool_name, error = %e, "unparseable tool arguments; using {{}}");
            Value::Object(Map::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
