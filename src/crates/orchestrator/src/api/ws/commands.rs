//! Client to server commands.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("malformed command: {0}")]
    Json(String),

    #[error("field '{field}' {problem}")]
    InvalidField {
        field: &'static str,
        problem: &'static str,
    },
}

/// A decoded client frame, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientCommand {
    /// An omitted or `null` request decodes as empty; `max_iterations` is
    /// `None` when omitted or `null`.
    StartFeedbackLoop {
        #[serde(default, deserialize_with = "null_as_empty")]
        request: String,
        #[serde(default)]
        max_iterations: Option<u32>,
    },
    StopFeedbackLoop,
    /// Any other action. Ignored by the session.
    #[serde(other)]
    Unknown,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ClientCommand {
    /// Decode a text frame.
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let command: ClientCommand =
            serde_json::from_str(text).map_err(|e| CommandError::Json(e.to_string()))?;

        if let ClientCommand::StartFeedbackLoop {
            max_iterations: Some(0),
            ..
        } = command
        {
            return Err(CommandError::InvalidField {
                field: "max_iterations",
                problem: "must be a positive integer",
            });
        }
        Ok(command)
    }
}
