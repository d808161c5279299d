//! Line-delimited JSON-RPC 2.0 framing.
//!
//! One request per line on the subprocess's stdin, one response per line on
//! its stdout.

use langgraph_core::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::ToolProtocolError;

pub const JSONRPC_VERSION: &str = "2.0";

pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method: method.into(),
            params,
        }
    }

    /// Serialized request followed by the line terminator.
    pub fn to_line(&self) -> Result<String, ToolProtocolError> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Params for `tools/call`.
pub fn call_params(name: &str, arguments: Value) -> Value {
    json!({ "name": name, "arguments": arguments })
}

/// Extract the `result` member of a parsed response line.
///
/// A top-level `error` member of any value fails the request. A missing
/// `result` is an empty object.
pub fn into_result(response: Value) -> Result<Value, ToolProtocolError> {
    let mut body = match response {
        Value::Object(body) => body,
        other => {
            return Err(ToolProtocolError::UnexpectedResponse(format!(
                "expected a JSON object, got {}",
                other
            )))
        }
    };
    if let Some(error) = body.remove("error") {
        return Err(ToolProtocolError::Rpc(error));
    }
    Ok(body.remove("result").unwrap_or_else(|| json!({})))
}

/// Result of `tools/list`.
#[derive(Debug, Default, Deserialize)]
pub struct ToolListResult {
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}
