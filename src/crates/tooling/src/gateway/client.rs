//! Subprocess-backed tool gateway.
//!
//! [`McpClient`] owns one tool provider process and talks to it over
//! newline-delimited JSON-RPC on stdin/stdout. Requests are strictly
//! one-at-a-time: the process handle sits behind an async mutex that is held
//! for the whole write-then-read exchange.
//!
//! Recovery is by replacement. Any failed exchange kills the process and
//! clears the handle; the next request spawns a new one.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use langgraph_core::ToolDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::ToolProtocolError;
use super::protocol::{self, JsonRpcRequest, ToolListResult, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST};
use super::ToolGateway;
use crate::logging::timed;

/// Variable telling the tool provider where the store backend lives.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// How to launch the tool provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpServerConfig {
    pub command: String,
    pub args: Vec<String>,
    /// Passed to the subprocess as `API_BASE_URL`.
    pub api_base_url: String,
    pub working_dir: Option<PathBuf>,
}

impl Default for McpServerConfig {
    fn default() -> Self {
        Self {
            command: "node".to_string(),
            args: vec!["mcp-server/index.js".to_string()],
            api_base_url: "http://localhost:8000/api".to_string(),
            working_dir: None,
        }
    }
}

impl McpServerConfig {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            ..Self::default()
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

struct McpProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl McpProcess {
    fn spawn(config: &McpServerConfig) -> Result<Self, ToolProtocolError> {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .env(API_BASE_URL_ENV, &config.api_base_url)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| ToolProtocolError::Spawn {
            command: config.command.clone(),
            source,
        })?;
        let stdin = child.stdin.take().ok_or(ToolProtocolError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(ToolProtocolError::MissingPipe("stdout"))?;

        info!(command = %config.command, pid = ?child.id(), "started MCP server");
        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    async fn round_trip(&mut self, request: &JsonRpcRequest) -> Result<Value, ToolProtocolError> {
        let line = request.to_line()?;
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;

        let mut response = String::new();
        if self.stdout.read_line(&mut response).await? == 0 {
            return Err(ToolProtocolError::StreamClosed);
        }

        let response: Value = serde_json::from_str(&response)?;
        if let Some(id) = response.get("id").and_then(Value::as_u64) {
            if id != request.id {
                warn!(expected = request.id, got = id, "MCP response id mismatch");
            }
        }
        protocol::into_result(response)
    }

    async fn shutdown(mut self) {
        if let Err(e) = self.child.kill().await {
            debug!(error = %e, "MCP server already gone");
        }
    }
}

/// Tool gateway backed by a supervised subprocess.
pub struct McpClient {
    config: McpServerConfig,
    process: Mutex<Option<McpProcess>>,
    request_id: AtomicU64,
}

impl McpClient {
    pub fn new(config: McpServerConfig) -> Self {
        Self {
            config,
            process: Mutex::new(None),
            request_id: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &McpServerConfig {
        &self.config
    }

    /// Start the subprocess unless a live one is already attached.
    pub async fn ensure_running(&self) -> Result<(), ToolProtocolError> {
        let mut slot = self.process.lock().await;
        Self::ensure_running_locked(&self.config, &mut slot).await?;
        Ok(())
    }

    async fn ensure_running_locked<'a>(
        config: &McpServerConfig,
        slot: &'a mut Option<McpProcess>,
    ) -> Result<&'a mut McpProcess, ToolProtocolError> {
        let alive = slot.as_mut().map(McpProcess::is_alive).unwrap_or(false);
        if !alive {
            if let Some(stale) = slot.take() {
                warn!(command = %config.command, "MCP server exited; restarting");
                stale.shutdown().await;
            }
            *slot = Some(McpProcess::spawn(config)?);
        }
        slot.as_mut().ok_or(ToolProtocolError::NotRunning)
    }

    /// Send one request and wait for its response line.
    ///
    /// Any failure kills the subprocess and clears the handle.
    pub async fn send_request(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, ToolProtocolError> {
        let mut slot = self.process.lock().await;
        let id = self.request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let request = JsonRpcRequest::new(id, method, params.unwrap_or_else(|| json!({})));

        let outcome = match Self::ensure_running_locked(&self.config, &mut slot).await {
            Ok(process) => timed(method, process.round_trip(&request)).await,
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(_) => debug!(method, request_id = id, "MCP request completed"),
            Err(err) => {
                warn!(method, request_id = id, error = %err, "MCP request failed; recycling server");
                if let Some(process) = slot.take() {
                    process.shutdown().await;
                }
            }
        }
        outcome
    }

    /// Whether a live subprocess is attached.
    pub async fn is_running(&self) -> bool {
        let mut slot = self.process.lock().await;
        slot.as_mut().map(McpProcess::is_alive).unwrap_or(false)
    }

    /// OS process id of the attached subprocess.
    pub async fn pid(&self) -> Option<u32> {
        self.process.lock().await.as_ref().and_then(|p| p.child.id())
    }

    /// Number of requests issued so far.
    pub fn requests_sent(&self) -> u64 {
        self.request_id.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolGateway for McpClient {
    async fn list_tools(&self) -> Vec<ToolDescriptor> {
        let result = match self.send_request(METHOD_TOOLS_LIST, None).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "listing MCP tools failed");
                return Vec::new();
            }
        };
        match serde_json::from_value::<ToolListResult>(result) {
            Ok(list) => list.tools,
            Err(e) => {
                warn!(error = %e, "malformed tools/list result");
                Vec::new()
            }
        }
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Value {
        let params = protocol::call_params(name, arguments);
        match self.send_request(METHOD_TOOLS_CALL, Some(params)).await {
            Ok(result) => result,
            Err(e) => json!({ "error": e.to_string() }),
        }
    }

    async fn is_connected(&self) -> bool {
        self.ensure_running().await.is_ok() && self.is_running().await
    }

    async fn close(&self) {
        if let Some(process) = self.process.lock().await.take() {
            info!(command = %self.config.command, "stopping MCP server");
            process.shutdown().await;
        }
    }
}
