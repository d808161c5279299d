//! The chat model trait.

use crate::error::Result;
use crate::llm::config::ChatRequest;
use crate::llm::response::ChatResponse;
use async_trait::async_trait;

/// Provider-agnostic interface to a chat model.
///
/// Given a prompt, a model returns generated text. Implementations own
/// transport, authentication and retries; callers only see
/// [`GraphError::Llm`](crate::GraphError::Llm) on failure.
///
/// Implementations must be `Send + Sync`; share them as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete reply.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Identifier of the underlying model, for logs.
    fn model_name(&self) -> &str {
        "unknown"
    }
}
