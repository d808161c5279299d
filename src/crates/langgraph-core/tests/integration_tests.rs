//! Integration tests for complete workflows
//!
//! A small plan/act loop wired from the public API: a scripted chat model
//! decides which tool to call and a registry executes it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use langgraph_core::{
    ChatModel, ChatRequest, ChatResponse, GraphError, Message, StateGraph, Tool, ToolRegistry,
    ToolResult, UsageMetadata, END, START,
};
use serde_json::{json, Value};

struct Scripted {
    replies: Mutex<VecDeque<String>>,
}

#[async_trait]
impl ChatModel for Scripted {
    async fn chat(&self, request: ChatRequest) -> langgraph_core::Result<ChatResponse> {
        assert!(!request.messages.is_empty());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GraphError::Llm("script exhausted".into()))?;
        Ok(ChatResponse::new(Message::assistant(next)).with_usage(UsageMetadata::new(3, 4)))
    }
}

struct Counter;

#[async_trait]
impl Tool for Counter {
    fn name(&self) -> &str {
        "count"
    }

    fn description(&self) -> &str {
        "Counts its arguments"
    }

    async fn invoke(&self, arguments: Value) -> ToolResult {
        let n = arguments.as_object().map(|o| o.len()).unwrap_or(0);
        Ok(json!({ "count": n }).to_string())
    }
}

#[derive(Clone, Default)]
struct LoopState {
    messages: Vec<Message>,
    tool_results: Vec<String>,
}

#[tokio::test]
async fn plan_act_loop_runs_until_model_is_done() {
    let model: Arc<dyn ChatModel> = Arc::new(Scripted {
        replies: Mutex::new(VecDeque::from(vec![
            "act".to_string(),
            "act".to_string(),
            "done".to_string(),
        ])),
    });
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(Counter));
    let registry = Arc::new(registry);

    let mut graph = StateGraph::new();
    let planner = Arc::clone(&model);
    graph.add_node("plan", move |mut s: LoopState| {
        let model = Arc::clone(&planner);
        async move {
            let reply = model.chat(ChatRequest::from_prompt("next?")).await?;
            s.messages.push(reply.message);
            Ok(s)
        }
    });
    let tools = Arc::clone(&registry);
    graph.add_node("act", move |mut s: LoopState| {
        let tools = Arc::clone(&tools);
        async move {
            let out = tools
                .invoke("count", json!({"a": 1, "b": 2}))
                .await
                .map_err(|e| GraphError::Execution(e.to_string()))?;
            s.tool_results.push(out);
            Ok(s)
        }
    });
    graph.add_edge(START, "plan");
    graph.add_conditional_edges(
        "plan",
        |s: &LoopState| {
            let last = s.messages.last().map(|m| m.text()).unwrap_or("");
            if last == "act" { "act".into() } else { "stop".into() }
        },
        [("act", "act"), ("stop", END)],
    );
    graph.add_edge("act", "plan");

    let out = graph.compile().unwrap().invoke(LoopState::default()).await.unwrap();
    assert_eq!(out.messages.len(), 3);
    assert_eq!(out.tool_results, vec![r#"{"count":2}"#, r#"{"count":2}"#]);
}

#[tokio::test]
async fn model_failure_surfaces_as_node_error() {
    let model: Arc<dyn ChatModel> = Arc::new(Scripted {
        replies: Mutex::new(VecDeque::new()),
    });

    let mut graph = StateGraph::new();
    graph.add_node("plan", move |s: LoopState| {
        let model = Arc::clone(&model);
        async move {
            model.chat(ChatRequest::from_prompt("next?")).await?;
            Ok(s)
        }
    });
    graph.add_edge(START, "plan");
    graph.add_edge("plan", END);

    let err = graph
        .compile()
        .unwrap()
        .invoke(LoopState::default())
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("script exhausted"));
}
