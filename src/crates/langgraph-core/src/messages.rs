//! Conversation messages
//!
//! A workflow's conversation is an append-only list of [`Message`]s. Each
//! message is tagged with the [`MessageRole`] of whoever produced it:
//!
//! - **Human** - the request that started the run
//! - **Assistant** - model replies and the workflow's own status notes
//! - **Tool** - raw tool output, linked to the step that produced it by `tool_call_id`
//! - **System** - instructions sent to a model
//!
//! ```rust
//! use langgraph_core::messages::{Message, MessageRole};
//!
//! let msg = Message::tool("{\"stores\": []}", "tool_1");
//! assert_eq!(msg.role, MessageRole::Tool);
//! assert_eq!(msg.tool_call_id.as_deref(), Some("tool_1"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    Human,
    Assistant,
    Tool,
}

/// A single conversation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,

    pub role: MessageRole,

    pub content: String,

    /// Links a tool result back to the step that requested it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_call_id: None,
            metadata: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a tool result message.
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        let mut msg = Self::new(MessageRole::Tool, content);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

/// Most recent message with the given role.
pub fn last_with_role(messages: &[Message], role: MessageRole) -> Option<&Message> {
    messages.iter().rev().find(|m| m.role == role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn constructors_set_roles() {
        assert_eq!(Message::human("hi").role, MessageRole::Human);
        assert_eq!(Message::assistant("hi").role, MessageRole::Assistant);
        assert_eq!(Message::system("hi").role, MessageRole::System);
        assert!(Message::human("hi").tool_call_id.is_none());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Message::human("a").id, Message::human("a").id);
    }

    #[test]
    fn role_serializes_lowercase() {
        let msg = Message::assistant("done").with_metadata(json!({"iteration": 2}));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["metadata"]["iteration"], 2);
        assert!(value.get("tool_call_id").is_none());
    }

    #[test]
    fn last_with_role_scans_backwards() {
        let messages = vec![
            Message::assistant("first"),
            Message::tool("{}", "tool_1"),
            Message::assistant("second"),
            Message::tool("{}", "tool_2"),
        ];
        let last = last_with_role(&messages, MessageRole::Assistant).unwrap();
        assert_eq!(last.text(), "second");
        assert!(last_with_role(&messages, MessageRole::Human).is_none());
    }
}
