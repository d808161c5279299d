//! Live session registry.
//!
//! Maps a session id to the outbound queue of its WebSocket writer task.
//! Sends are best effort: an unknown or closed session is a no-op, and a
//! failed send drops the registration instead of surfacing an error.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::workflow::WorkflowEvent;

/// Outbound queue of one session.
pub type EventSender = mpsc::Sender<String>;

struct SessionEntry {
    sender: EventSender,
    connected_at: DateTime<Utc>,
}

/// Process-wide table of connected sessions.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    total_connections: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and greet it with a `connection` event.
    pub async fn connect(&self, session_id: &str, sender: EventSender) {
        self.sessions.insert(
            session_id.to_string(),
            SessionEntry {
                sender,
                connected_at: Utc::now(),
            },
        );
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        info!(session_id, active = self.sessions.len(), "session connected");

        self.send(session_id, &WorkflowEvent::connected(session_id)).await;
    }

    /// Remove a session. Returns whether it was registered.
    pub fn disconnect(&self, session_id: &str) -> bool {
        match self.sessions.remove(session_id) {
            Some((_, entry)) => {
                let duration = Utc::now() - entry.connected_at;
                info!(
                    session_id,
                    connected_secs = duration.num_seconds(),
                    "session disconnected"
                );
                true
            }
            None => false,
        }
    }

    /// Deliver an event. Returns whether it was queued.
    pub async fn send(&self, session_id: &str, event: &WorkflowEvent) -> bool {
        // Clone the sender so no map guard is held across the await.
        let sender = match self.sessions.get(session_id) {
            Some(entry) => entry.sender.clone(),
            None => {
                trace!(session_id, event = event.kind(), "no such session; dropping event");
                return false;
            }
        };
        if sender.is_closed() {
            debug!(session_id, event = event.kind(), "session writer closed; dropping session");
            self.disconnect(session_id);
            return false;
        }

        let message = match event.to_message() {
            Ok(message) => message,
            Err(e) => {
                error!(session_id, event = event.kind(), error = %e, "failed to serialize event");
                return false;
            }
        };

        if let Err(e) = sender.send(message).await {
            warn!(session_id, event = event.kind(), error = %e, "send failed; dropping session");
            self.disconnect(session_id);
            return false;
        }
        true
    }

    pub fn is_connected(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Sessions registered since start, including closed ones.
    pub fn total_connections(&self) -> u64 {
        self.total_connections.load(Ordering::Relaxed)
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|entry| entry.key().clone()).collect()
    }
}
