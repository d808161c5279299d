//! Chat model integration.
//!
//! langgraph-core does not talk to any provider itself. It defines the
//! [`ChatModel`] trait plus request and response types; provider crates
//! implement the trait and workflows hold an `Arc<dyn ChatModel>`.
//!
//! ```rust,ignore
//! use langgraph_core::llm::{ChatModel, ChatRequest};
//! use langgraph_core::Message;
//!
//! let request = ChatRequest::new(vec![Message::human("Summarize the run")])
//!     .with_temperature(0.1);
//! let reply = model.chat(request).await?;
//! println!("{}", reply.text());
//! ```

pub mod config;
pub mod response;
pub mod traits;

pub use config::{ChatConfig, ChatRequest};
pub use response::{ChatResponse, UsageMetadata};
pub use traits::ChatModel;
