//! WebSocket session handler
//!
//! One socket is one session. A writer task drains the session's outbound
//! queue onto the socket while this task reads commands. Runs execute inline
//! in the command loop, so a session hosts at most one run at a time and a
//! stop command only takes effect between runs.

use std::borrow::Cow;
use std::fmt::Display;
use std::sync::Arc;

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::commands::ClientCommand;
use super::registry::SessionRegistry;
use crate::api::routes::AppState;
use crate::workflow::{FeedbackLoopExecutor, WorkflowEvent};

/// Close reason sent when no Gemini API key is configured.
pub const MISSING_API_KEY_REASON: &str = "GEMINI_API_KEY not set in environment";

/// Outbound events buffered per session before sends start waiting.
const OUTBOUND_QUEUE: usize = 256;

/// `GET /gemini/ws/feedback-loop`
pub async fn feedback_loop_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_session(socket, state))
}

async fn handle_session(mut socket: WebSocket, state: AppState) {
    let Some(api_key) = state.config.gemini.api_key() else {
        warn!(env = %state.config.gemini.api_key_env, "rejecting session: no API key");
        let frame = CloseFrame {
            code: close_code::POLICY,
            reason: Cow::Borrowed(MISSING_API_KEY_REASON),
        };
        if let Err(e) = socket.send(Message::Close(Some(frame))).await {
            debug!(error = %e, "close frame not delivered");
        }
        return;
    };

    let session_id = Uuid::new_v4().to_string();
    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::channel::<String>(OUTBOUND_QUEUE);

    let writer = tokio::spawn(write_events(
        sink,
        rx,
        Arc::clone(&state.registry),
        session_id.clone(),
    ));

    state.registry.connect(&session_id, tx).await;

    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => {
                debug!(session_id, "client closed the socket");
                break;
            }
            Ok(_) => continue,
            Err(e) => {
                warn!(session_id, error = %e, "socket read failed");
                state
                    .registry
                    .send(&session_id, &WorkflowEvent::error(format!("WebSocket error: {e}")))
                    .await;
                break;
            }
        };

        match ClientCommand::parse(&text) {
            Ok(ClientCommand::StartFeedbackLoop {
                request,
                max_iterations,
            }) => {
                if request.is_empty() {
                    state
                        .registry
                        .send(&session_id, &WorkflowEvent::error("Request is required"))
                        .await;
                    continue;
                }
                let budget = max_iterations.unwrap_or(state.config.workflow.default_max_iterations);
                run_feedback_loop(&state, &session_id, &api_key, &request, budget).await;
            }
            Ok(ClientCommand::StopFeedbackLoop) => {
                info!(session_id, "stop requested");
                state
                    .registry
                    .send(
                        &session_id,
                        &WorkflowEvent::notice("LangGraph workflow stopped by user"),
                    )
                    .await;
                break;
            }
            Ok(ClientCommand::Unknown) => {
                debug!(session_id, "ignoring unknown action");
            }
            Err(e) => {
                state
                    .registry
                    .send(&session_id, &WorkflowEvent::error(format!("Invalid command: {e}")))
                    .await;
            }
        }
    }

    // Dropping the registration drops the last sender, which lets the writer
    // flush what is queued and close the socket.
    state.registry.disconnect(&session_id);
    if let Err(e) = writer.await {
        warn!(session_id, error = %e, "session writer task failed");
    }
}

/// Drain a session's queue onto its socket.
///
/// A failed write drops the session from the registry so later sends are
/// no-ops. When the queue closes the socket gets a close frame.
async fn write_events<S>(
    mut sink: S,
    mut rx: mpsc::Receiver<String>,
    registry: Arc<SessionRegistry>,
    session_id: String,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(text) = rx.recv().await {
        if let Err(e) = sink.send(Message::Text(text)).await {
            warn!(session_id = %session_id, error = %e, "socket write failed; dropping session");
            registry.disconnect(&session_id);
            return;
        }
    }
    if let Err(e) = sink.send(Message::Close(None)).await {
        debug!(session_id = %session_id, error = %e, "close frame not delivered");
    }
}

async fn run_feedback_loop(state: &AppState, session_id: &str, api_key: &str, request: &str, budget: u32) {
    let model = match state.backend.chat_model(api_key) {
        Ok(model) => model,
        Err(e) => {
            warn!(session_id, error = %e, "could not create model client");
            state
                .registry
                .send(session_id, &WorkflowEvent::error(format!("LangGraph workflow error: {e}")))
                .await;
            return;
        }
    };

    let mut executor =
        FeedbackLoopExecutor::new(model, state.backend.tool_gateway(), state.registry.clone());
    if let Some(temperature) = state.backend.temperature() {
        executor = executor.with_temperature(temperature);
    }

    // Failures were already reported to the client.
    if let Err(e) = executor.execute_feedback_loop(session_id, request, budget).await {
        debug!(session_id, error = %e, "run ended with an error");
    }
}
