use serde_json::Value;
use thiserror::Error;

/// Failures talking to the tool provider subprocess.
///
/// Any of these recycles the subprocess: the handle is dropped and the next
/// request starts a fresh one.
#[derive(Debug, Error)]
pub enum ToolProtocolError {
    #[error("failed to start MCP server '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("MCP server {0} pipe unavailable")]
    MissingPipe(&'static str),

    #[error("MCP server I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output stream closed before a response line arrived.
    #[error("No response from MCP server")]
    StreamClosed,

    #[error("Invalid JSON from MCP server: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unexpected MCP response: {0}")]
    UnexpectedResponse(String),

    /// The response carried a top-level `error` member.
    #[error("MCP Error: {0}")]
    Rpc(Value),

    #[error("MCP server is not running")]
    NotRunning,
}

impl ToolProtocolError {
    /// True when the subprocess itself misbehaved, as opposed to a well-formed
    /// error reply.
    pub fn is_transport(&self) -> bool {
        !matches!(self, ToolProtocolError::Rpc(_))
    }
}
