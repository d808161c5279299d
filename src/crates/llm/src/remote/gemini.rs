//! Google Gemini client implementation.
//!
//! Talks to the Gemini REST API (`models/{model}:generateContent`).
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::GeminiClient;
//! use llm::config::RemoteLlmConfig;
//! use langgraph_core::llm::{ChatModel, ChatRequest};
//!
//! let config = RemoteLlmConfig::from_env(
//!     "GEMINI_API_KEY",
//!     llm::remote::gemini::DEFAULT_GEMINI_BASE_URL,
//!     llm::remote::gemini::DEFAULT_GEMINI_MODEL,
//! )?;
//! let client = GeminiClient::new(config)?;
//!
//! let response = client.chat(ChatRequest::from_prompt("Hello!")).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use langgraph_core::error::Result as GraphResult;
use langgraph_core::llm::{ChatModel, ChatRequest, ChatResponse, UsageMetadata};
use langgraph_core::{Message, MessageRole};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash-exp";

const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Google Gemini API client.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteLlmConfig {
        &self.config
    }

    /// Build the request body. System messages become the system instruction;
    /// tool results are replayed as user turns.
    fn build_request(&self, request: &ChatRequest) -> GeminiRequest {
        let mut contents = Vec::new();
        let mut system_parts = Vec::new();

        for msg in &request.messages {
            let (role, text) = match msg.role {
                MessageRole::System => {
                    system_parts.push(GeminiPart {
                        text: msg.text().to_string(),
                    });
                    continue;
                }
                MessageRole::Human => ("user", msg.text().to_string()),
                MessageRole::Assistant => ("model", msg.text().to_string()),
                MessageRole::Tool => ("user", format!("[Tool Result] {}", msg.text())),
            };
            contents.push(GeminiContent {
                role: Some(role.to_string()),
                parts: vec![GeminiPart { text }],
            });
        }

        let cfg = &request.config;
        let generation_config = GeminiGenerationConfig {
            temperature: cfg.temperature,
            max_output_tokens: cfg.max_tokens,
            top_p: cfg.top_p,
            stop_sequences: (!cfg.stop_sequences.is_empty()).then(|| cfg.stop_sequences.clone()),
        };

        GeminiRequest {
            contents,
            system_instruction: (!system_parts.is_empty()).then(|| GeminiContent {
                role: None,
                parts: system_parts,
            }),
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }

    fn convert_response(&self, resp: GeminiResponse) -> Result<ChatResponse> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no candidates".into()))?;

        let text = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        let mut response = ChatResponse::new(Message::assistant(text)).with_metadata(json!({
            "model": self.config.model,
            "finish_reason": candidate.finish_reason,
        }));
        if let Some(u) = resp.usage_metadata {
            response = response.with_usage(UsageMetadata::new(
                u.prompt_token_count,
                u.candidates_token_count,
            ));
        }
        Ok(response)
    }

    async fn generate_once(&self, body: &GeminiRequest) -> Result<ChatResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );

        // Gemini takes the API key as a query parameter
        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.config.api_key)])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status, error_text));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        self.convert_response(parsed)
    }
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> GraphResult<ChatResponse> {
        let body = self.build_request(&request);
        let mut attempt = 0u32;

        loop {
            match self.generate_once(&body).await {
                Ok(response) => {
                    debug!(model = %self.config.model, attempt, "gemini call succeeded");
                    return Ok(response);
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                    warn!(model = %self.config.model, attempt, error = %err, ?delay, "retrying gemini call");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

impl GeminiGenerationConfig {
    fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_output_tokens.is_none()
            && self.top_p.is_none()
            && self.stop_sequences.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}
