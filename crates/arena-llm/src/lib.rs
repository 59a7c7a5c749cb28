//! # Arena LLM
//!
//! The response client used by the debate engine.
//!
//! ## Supported Backends
//!
//! | Provider | Type | Key Required |
//! |----------|------|--------------|
//! | OpenAI-compatible (Nebius by default) | API | `NEBIUS_API_KEY` or `ARENA_API_KEY` |
//! | Mock | Testing / offline | None |
//!
//! Providers perform exactly one HTTP call per [`LlmProvider::complete`] and
//! never retry; retry policy belongs to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_core::{GenerationParams, Message, Stance, Transcript};
//! use arena_llm::{ChatRequest, LlmProvider, MockProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = MockProvider::constant("Markets clear. Mandates do not.");
//!
//!     let mut transcript = Transcript::new();
//!     transcript.push(Message::user("Should the minimum wage rise?"));
//!
//!     let request = ChatRequest::from_transcript(&transcript, "mock-model", GenerationParams::default());
//!     let response = llm.complete(request).await.unwrap();
//!     assert_eq!(response.content.as_deref(), Some("Markets clear. Mandates do not."));
//! }
//! ```
//!
//! ## With an OpenAI-compatible endpoint
//!
//! ```rust,ignore
//! use arena_llm::{LlmConfig, OpenAiCompatibleProvider};
//!
//! let config = LlmConfig::from_env()?;
//! let llm = OpenAiCompatibleProvider::from_config(&config)?;
//! ```

pub mod config;
pub mod mock;
pub mod openai;
pub mod provider;

pub use config::{ConfigError, LlmConfig};
pub use mock::{MockProvider, MockReply};
pub use openai::OpenAiCompatibleProvider;
pub use provider::{ChatMessage, ChatRequest, ChatResponse, LlmError, LlmProvider};
