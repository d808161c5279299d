//! Remote LLM provider implementations.
//!
//! - **Gemini** - Google's Gemini models over the REST API

pub mod gemini;

pub use gemini::GeminiClient;
