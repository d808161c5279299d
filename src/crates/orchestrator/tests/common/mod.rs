//! In-memory model and gateway doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use langgraph_core::{ChatModel, ChatRequest, ChatResponse, GraphError, Message, ToolDescriptor};
use orchestrator::workflow::WorkflowBackend;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tooling::gateway::ToolGateway;

/// Replays scripted replies, then a fixed fallback.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: String,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            fallback: "Summary: the request was handled.".to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answers every call with `reply`.
    pub fn repeating(reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, request: ChatRequest) -> langgraph_core::Result<ChatResponse> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Ok(text)) => Ok(ChatResponse::new(Message::assistant(text))),
            Some(Err(e)) => Err(GraphError::Llm(e)),
            None => Ok(ChatResponse::new(Message::assistant(self.fallback.clone()))),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Wrap a payload the way the tool provider does.
pub fn envelope(payload: Value) -> Value {
    json!({"content": [{"type": "text", "text": payload.to_string()}]})
}

/// Gateway answering from a table, recording calls.
pub struct FakeGateway {
    tools: Vec<ToolDescriptor>,
    results: Mutex<HashMap<String, Value>>,
    pub calls: Mutex<Vec<(String, Value)>>,
    pub closed: AtomicBool,
    pub close_calls: AtomicUsize,
    connected: bool,
}

impl FakeGateway {
    pub fn new(tools: &[(&str, &str)]) -> Self {
        Self {
            tools: tools
                .iter()
                .map(|(name, description)| ToolDescriptor::new(*name, *description))
                .collect(),
            results: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
            close_calls: AtomicUsize::new(0),
            connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::new(&[])
        }
    }

    pub fn with_result(self, tool: &str, result: Value) -> Self {
        self.results.lock().unwrap().insert(tool.to_string(), result);
        self
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolGateway for FakeGateway {
    async fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.tools.clone()
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> Value {
        self.calls.lock().unwrap().push((name.to_string(), arguments));
        self.results
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_else(|| json!({"error": format!("no result for {name}")}))
    }

    async fn is_connected(&self) -> bool {
        self.connected
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Backend handing out the same doubles every time.
pub struct FakeBackend {
    pub model: Arc<ScriptedModel>,
    pub gateway: Arc<FakeGateway>,
    pub fail_model: bool,
}

impl WorkflowBackend for FakeBackend {
    fn chat_model(&self, _api_key: &str) -> orchestrator::Result<Arc<dyn ChatModel>> {
        if self.fail_model {
            return Err(orchestrator::OrchestratorError::General("model unavailable".into()));
        }
        Ok(self.model.clone())
    }

    fn tool_gateway(&self) -> Arc<dyn ToolGateway> {
        self.gateway.clone()
    }
}

/// Drain everything queued on a session receiver as parsed JSON.
pub fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<Value> {
    let mut events = Vec::new();
    while let Ok(text) = rx.try_recv() {
        events.push(serde_json::from_str(&text).unwrap());
    }
    events
}

pub fn types(events: &[Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub fn of_type<'a>(events: &'a [Value], kind: &str) -> Vec<&'a Value> {
    events.iter().filter(|e| e["type"] == kind).collect()
}
