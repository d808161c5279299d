//! LLM provider implementations.
//!
//! Concrete implementations of the [`ChatModel`](langgraph_core::llm::ChatModel)
//! trait from `langgraph-core`.
//!
//! # Remote Providers
//!
//! - **Gemini** - Google's Gemini models
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::remote::GeminiClient;
//! use llm::config::RemoteLlmConfig;
//! use langgraph_core::llm::{ChatModel, ChatRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env(
//!         "GEMINI_API_KEY",
//!         "https://generativelanguage.googleapis.com/v1beta",
//!         "gemini-2.0-flash-exp",
//!     )?;
//!     let client = GeminiClient::new(config)?;
//!
//!     let response = client.chat(ChatRequest::from_prompt("Explain Rust briefly")).await?;
//!     println!("Response: {}", response.text());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod remote;

pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use remote::GeminiClient;
