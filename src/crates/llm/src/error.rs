//! Error types for LLM provider implementations.

use thiserror::Error;

/// Result type for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to an LLM provider.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// API authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// API key not found in environment.
    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Provider returned a body we could not use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Non-success status not covered above.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// Server-side failure (5xx).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Check if this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::HttpError(_) | LlmError::ServiceUnavailable(_) | LlmError::RateLimitExceeded(_)
        )
    }

    /// Check if this error is due to authentication.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LlmError::AuthenticationError(_) | LlmError::ApiKeyNotFound(_)
        )
    }

    /// Classify a non-success HTTP status.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationError(body),
            429 => LlmError::RateLimitExceeded(body),
            500..=599 => LlmError::ServiceUnavailable(format!("{}: {}", status, body)),
            _ => LlmError::ProviderError(format!("{}: {}", status, body)),
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

/// Surface provider failures through the `ChatModel` trait.
impl From<LlmError> for langgraph_core::GraphError {
    fn from(err: LlmError) -> Self {
        langgraph_core::GraphError::Llm(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn status_classification() {
        assert!(LlmError::from_status(StatusCode::UNAUTHORIZED, "no".into()).is_auth_error());
        assert!(LlmError::from_status(StatusCode::FORBIDDEN, "no".into()).is_auth_error());
        assert!(LlmError::from_status(StatusCode::TOO_MANY_REQUESTS, "slow".into()).is_retryable());
        assert!(LlmError::from_status(StatusCode::BAD_GATEWAY, "".into()).is_retryable());

        let bad = LlmError::from_status(StatusCode::BAD_REQUEST, "bad".into());
        assert!(!bad.is_retryable());
        assert!(matches!(bad, LlmError::ProviderError(_)));
    }

    #[test]
    fn converts_into_graph_error() {
        let err: langgraph_core::GraphError = LlmError::InvalidResponse("empty".into()).into();
        assert_eq!(err.to_string(), "LLM error: Invalid response: empty");
    }
}
