//! Feedback loop executor
//!
//! Drives one request through a five-node state graph:
//!
//! ```text
//!  initialize ──▶ analyze_and_plan ──execute──▶ execute_tool ──▶ update_context
//!                   ▲      │                                          │
//!                   │      └──finish──▶ finalize ◀──────finish────────┤
//!                   └──────────────────continue───────────────────────┘
//! ```
//!
//! Every node reports progress through the [`SessionRegistry`]. Node-level
//! failures (model errors, unknown tools) become conversation messages and
//! `error` events; only a failure of the graph itself aborts the run.

use std::sync::Arc;

use langgraph_core::{
    ChatModel, ChatRequest, CompiledGraph, GraphError, Message, StateGraph, ToolRegistry, END, START,
};
use serde_json::json;
use tooling::gateway::{is_context_loading_tool, is_data_modifying_tool, ToolGateway};
use tooling::logging::timed;
use tooling::tools::load_tools;
use tracing::{debug, info, warn};

use super::events::{result_payload, FinalState, WorkflowEvent, FRAMEWORK};
use super::parser::extract_tool_call;
use super::prompts::{analysis_prompt, summary_prompt};
use super::routing::{should_continue, should_execute_tool, ContinueDecision, PlanDecision};
use super::state::{ExecutedToolRecord, ToolCallRequest, WorkflowState};
use crate::api::ws::SessionRegistry;
use crate::Result;

pub const NODE_INITIALIZE: &str = "initialize";
pub const NODE_ANALYZE: &str = "analyze_and_plan";
pub const NODE_EXECUTE: &str = "execute_tool";
pub const NODE_UPDATE_CONTEXT: &str = "update_context";
pub const NODE_FINALIZE: &str = "finalize";

/// Graph steps allowed per iteration budget unit, plus slack for the
/// initialize, final analysis and finalize visits.
fn recursion_limit(max_iterations: u32) -> usize {
    (max_iterations as usize).saturating_mul(3).saturating_add(8)
}

/// Shared by every node closure of one run.
struct Nodes {
    model: Arc<dyn ChatModel>,
    gateway: Arc<dyn ToolGateway>,
    registry: Arc<SessionRegistry>,
    tools: ToolRegistry,
    temperature: Option<f32>,
}

impl Nodes {
    async fn emit(&self, state: &WorkflowState, event: WorkflowEvent) {
        self.registry.send(&state.session_id, &event).await;
    }

    /// Append an error note to the conversation and report it.
    async fn fail_step(&self, state: &mut WorkflowState, message: String) {
        warn!(session_id = %state.session_id, iteration = state.iteration, "{}", message);
        state.push_message(Message::assistant(message.clone()));
        self.emit(state, WorkflowEvent::node_error(state.iteration, message))
            .await;
    }

    async fn ask(&self, prompt: String) -> langgraph_core::Result<String> {
        let mut request = ChatRequest::from_prompt(prompt);
        if let Some(t) = self.temperature {
            request = request.with_temperature(t);
        }
        let response = timed(self.model.model_name(), self.model.chat(request)).await?;
        Ok(response.text().to_string())
    }

    async fn initialize(&self, mut state: WorkflowState) -> langgraph_core::Result<WorkflowState> {
        self.emit(
            &state,
            WorkflowEvent::node(NODE_INITIALIZE, None, "Initializing LangGraph workflow..."),
        )
        .await;

        state.system_context = self.gateway.get_system_context().await;
        state.iteration = 0;

        self.emit(
            &state,
            WorkflowEvent::SystemContext {
                available_tools: state.available_tools.len(),
                system_summary: state.system_context.total_counts,
            },
        )
        .await;

        state.push_message(Message::assistant(format!(
            "Workflow initialized. System context loaded with {} tools available.",
            self.tools.len()
        )));
        Ok(state)
    }

    async fn analyze_and_plan(&self, mut state: WorkflowState) -> langgraph_core::Result<WorkflowState> {
        state.iteration = state.iteration.saturating_add(1);
        let iteration = state.iteration;
        debug!(session_id = %state.session_id, iteration, "analyzing");

        self.emit(
            &state,
            WorkflowEvent::IterationStart {
                iteration,
                max_iterations: state.max_iterations,
            },
        )
        .await;
        self.emit(
            &state,
            WorkflowEvent::node(
                NODE_ANALYZE,
                Some(iteration),
                "Gemini analyzing current state and planning next action...",
            ),
        )
        .await;

        match self.ask(analysis_prompt(&state)).await {
            Ok(reply) => {
                let analysis = if reply.is_empty() {
                    "No analysis generated".to_string()
                } else {
                    reply
                };
                state.push_message(
                    Message::assistant(analysis.clone())
                        .with_metadata(json!({"iteration": iteration, "node": NODE_ANALYZE})),
                );
                self.emit(&state, WorkflowEvent::GeminiAnalysis { iteration, analysis })
                    .await;
            }
            Err(e) => self.fail_step(&mut state, format!("Analysis error: {e}")).await,
        }
        Ok(state)
    }

    async fn execute_tool(&self, mut state: WorkflowState) -> langgraph_core::Result<WorkflowState> {
        self.emit(
            &state,
            WorkflowEvent::node(NODE_EXECUTE, Some(state.iteration), "Executing planned tool..."),
        )
        .await;

        match extract_tool_call(state.last_message_text()) {
            Some(call) => self.run_tool(&mut state, call).await,
            None => debug!(
                session_id = %state.session_id,
                iteration = state.iteration,
                "no tool call in reply"
            ),
        }
        Ok(state)
    }

    async fn run_tool(&self, state: &mut WorkflowState, call: ToolCallRequest) {
        let iteration = state.iteration;
        let ToolCallRequest { tool_name, arguments } = call;

        self.emit(
            state,
            WorkflowEvent::ToolExecutionStart {
                iteration,
                tool_name: tool_name.clone(),
                arguments: arguments.clone(),
            },
        )
        .await;

        let Some(tool) = self.tools.get(&tool_name) else {
            self.fail_step(state, format!("Tool {tool_name} not found")).await;
            return;
        };

        let result = match timed(&tool_name, tool.invoke(arguments.clone())).await {
            Ok(result) => result,
            Err(e) => {
                self.fail_step(state, format!("Tool execution error: {e}")).await;
                return;
            }
        };

        let record = ExecutedToolRecord::new(iteration, tool_name.clone(), arguments.clone(), result.clone());
        let success = record.success;
        info!(session_id = %state.session_id, iteration, tool = %tool_name, success, "tool executed");

        state.executed_tools.push(record);
        state.push_message(Message::tool(result.clone(), format!("tool_{iteration}")));

        self.emit(
            state,
            WorkflowEvent::ToolExecutionResult {
                iteration,
                tool_name,
                arguments,
                success,
                result: result_payload(&result),
            },
        )
        .await;
    }

    async fn update_context(&self, mut state: WorkflowState) -> langgraph_core::Result<WorkflowState> {
        let iteration = state.iteration;
        self.emit(
            &state,
            WorkflowEvent::node(
                NODE_UPDATE_CONTEXT,
                Some(iteration),
                "Checking if context update is needed...",
            ),
        )
        .await;

        let (refresh, reason) = match state.last_execution() {
            None => (false, "No tool executed yet".to_string()),
            Some(record) if is_context_loading_tool(&record.tool_name) => {
                (true, format!("Context loaded via {}", record.tool_name))
            }
            Some(record)
                if is_data_modifying_tool(&record.tool_name) && state.system_context.context_loaded =>
            {
                (true, format!("Context refreshed after {}", record.tool_name))
            }
            Some(record) => (false, format!("No context update needed for {}", record.tool_name)),
        };

        if refresh {
            self.gateway
                .refresh_system_context(&mut state.system_context)
                .await;
        }

        let verdict = if refresh { "updated" } else { "update skipped" };
        state.push_message(
            Message::assistant(format!("System context {verdict}: {reason}"))
                .with_metadata(json!({"node": NODE_UPDATE_CONTEXT})),
        );

        let event = if refresh {
            WorkflowEvent::SystemUpdate {
                iteration,
                reason,
                updated_context: state.system_context.total_counts,
            }
        } else {
            WorkflowEvent::ContextUpdateSkipped { iteration, reason }
        };
        self.emit(&state, event).await;
        Ok(state)
    }

    async fn finalize(&self, mut state: WorkflowState) -> langgraph_core::Result<WorkflowState> {
        self.emit(
            &state,
            WorkflowEvent::node(NODE_FINALIZE, Some(state.iteration), "Generating final summary..."),
        )
        .await;

        let summary = match self.ask(summary_prompt(&state)).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "Summary generation failed".to_string(),
            Err(e) => format!("Error generating summary: {e}"),
        };

        state.push_message(
            Message::assistant(summary.clone())
                .with_metadata(json!({"node": NODE_FINALIZE, "type": "summary"})),
        );

        self.emit(
            &state,
            WorkflowEvent::FeedbackLoopComplete {
                total_iterations: state.iteration,
                tools_executed: state.executed_tools.len(),
                successful_tools: state.successful_tools(),
                summary,
            },
        )
        .await;
        Ok(state)
    }
}

/// Runs feedback loops for one session against one gateway.
///
/// The gateway is closed at the end of every run, so an executor is meant
/// to be built per run.
pub struct FeedbackLoopExecutor {
    model: Arc<dyn ChatModel>,
    gateway: Arc<dyn ToolGateway>,
    registry: Arc<SessionRegistry>,
    temperature: Option<f32>,
}

impl FeedbackLoopExecutor {
    pub fn new(
        model: Arc<dyn ChatModel>,
        gateway: Arc<dyn ToolGateway>,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            model,
            gateway,
            registry,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Run one request to completion.
    ///
    /// Graph failures are reported to the session as an `error` event and
    /// returned. The gateway is closed on every path.
    pub async fn execute_feedback_loop(
        &self,
        session_id: &str,
        request: &str,
        max_iterations: u32,
    ) -> Result<WorkflowState> {
        info!(session_id, max_iterations, "starting feedback loop");
        let outcome = self.run(session_id, request, max_iterations).await;

        if let Err(e) = &outcome {
            warn!(session_id, error = %e, "feedback loop failed");
            self.registry
                .send(session_id, &WorkflowEvent::error(format!("LangGraph workflow error: {e}")))
                .await;
        }

        self.gateway.close().await;
        outcome
    }

    async fn run(&self, session_id: &str, request: &str, max_iterations: u32) -> Result<WorkflowState> {
        self.registry
            .send(
                session_id,
                &WorkflowEvent::WorkflowStart {
                    initial_request: request.to_string(),
                    max_iterations,
                    framework: FRAMEWORK.to_string(),
                },
            )
            .await;

        let tools = load_tools(Arc::clone(&self.gateway)).await;
        let descriptors = tools.descriptors();
        let graph = self.build_graph(tools)?.with_recursion_limit(recursion_limit(max_iterations));

        let state = WorkflowState::new(session_id, request, max_iterations, descriptors);
        let final_state = graph.invoke(state).await?;

        info!(
            session_id,
            iterations = final_state.iteration,
            tools_executed = final_state.executed_tools.len(),
            "feedback loop finished"
        );

        self.registry
            .send(
                session_id,
                &WorkflowEvent::WorkflowComplete {
                    total_iterations: final_state.iteration,
                    tools_executed: final_state.executed_tools.len(),
                    successful_tools: final_state.successful_tools(),
                    final_state: FinalState {
                        system_context: final_state.system_context.clone(),
                        executed_tools: final_state.executed_tools.clone(),
                    },
                },
            )
            .await;

        Ok(final_state)
    }

    fn build_graph(&self, tools: ToolRegistry) -> std::result::Result<CompiledGraph<WorkflowState>, GraphError> {
        let nodes = Arc::new(Nodes {
            model: Arc::clone(&self.model),
            gateway: Arc::clone(&self.gateway),
            registry: Arc::clone(&self.registry),
            tools,
            temperature: self.temperature,
        });

        let mut graph: StateGraph<WorkflowState> = StateGraph::new();

        let n = Arc::clone(&nodes);
        graph.add_node(NODE_INITIALIZE, move |state| {
            let n = Arc::clone(&n);
            async move { n.initialize(state).await }
        });
        let n = Arc::clone(&nodes);
        graph.add_node(NODE_ANALYZE, move |state| {
            let n = Arc::clone(&n);
            async move { n.analyze_and_plan(state).await }
        });
        let n = Arc::clone(&nodes);
        graph.add_node(NODE_EXECUTE, move |state| {
            let n = Arc::clone(&n);
            async move { n.execute_tool(state).await }
        });
        let n = Arc::clone(&nodes);
        graph.add_node(NODE_UPDATE_CONTEXT, move |state| {
            let n = Arc::clone(&n);
            async move { n.update_context(state).await }
        });
        let n = nodes;
        graph.add_node(NODE_FINALIZE, move |state| {
            let n = Arc::clone(&n);
            async move { n.finalize(state).await }
        });

        graph.add_edge(START, NODE_INITIALIZE);
        graph.add_edge(NODE_INITIALIZE, NODE_ANALYZE);
        graph.add_conditional_edges(
            NODE_ANALYZE,
            |state: &WorkflowState| should_execute_tool(state).as_str().to_string(),
            [
                (PlanDecision::EXECUTE, NODE_EXECUTE),
                (PlanDecision::FINISH, NODE_FINALIZE),
            ],
        );
        graph.add_edge(NODE_EXECUTE, NODE_UPDATE_CONTEXT);
        graph.add_conditional_edges(
            NODE_UPDATE_CONTEXT,
            |state: &WorkflowState| should_continue(state).as_str().to_string(),
            [
                (ContinueDecision::CONTINUE, NODE_ANALYZE),
                (ContinueDecision::FINISH, NODE_FINALIZE),
            ],
        );
        graph.add_edge(NODE_FINALIZE, END);

        graph.compile()
    }
}
