//! LLM provider trait and common types

use arena_core::{GenerationParams, Role, Transcript};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from LLM providers
///
/// Every transport or decoding fault is converted into one of these at the
/// provider boundary. An empty completion is not an error.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Provider not available")]
    NotAvailable,
}

impl LlmError {
    /// HTTP status code, when the endpoint answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::RateLimited => Some(429),
            _ => None,
        }
    }
}

/// One `{role, content}` pair of the outbound conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A chat-completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier of the speaking persona
    pub model: String,
    /// Ordered conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling knobs, passed through verbatim
    pub params: GenerationParams,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, params: GenerationParams) -> Self {
        Self {
            model: model.into(),
            messages,
            params,
        }
    }

    /// Serialize a full transcript, in order, for the given model
    pub fn from_transcript(
        transcript: &Transcript,
        model: impl Into<String>,
        params: GenerationParams,
    ) -> Self {
        let messages = transcript
            .iter()
            .map(|m| ChatMessage::new(m.role, m.content.clone()))
            .collect();
        Self::new(model, messages, params)
    }

    /// Single user prompt
    pub fn simple(model: impl Into<String>, prompt: &str) -> Self {
        Self::new(
            model,
            vec![ChatMessage::new(Role::User, prompt)],
            GenerationParams::default(),
        )
    }
}

/// Response from an LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated text; `None` when the endpoint returned no usable content
    pub content: Option<String>,
    /// Model that answered
    pub model: String,
    /// Tokens used (if available)
    pub tokens_used: Option<u32>,
    /// Time taken in milliseconds
    pub latency_ms: u64,
}

impl ChatResponse {
    /// True when there is no content or only whitespace
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().map_or(true, |c| c.trim().is_empty())
    }

    /// Content with empty completions replaced by `fallback`
    pub fn text_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.is_empty() {
            fallback
        } else {
            self.content.as_deref().unwrap_or(fallback)
        }
    }
}

/// Trait for chat-completion providers
#[async_trait]
pub trait LlmProvider: Send + Sync + std::fmt::Debug {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Check if the provider is reachable
    async fn is_available(&self) -> bool;

    /// Generate one completion. Implementations must not retry.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError>;

    /// Single prompt convenience; empty completions come back as `""`
    async fn ask(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        let response = self.complete(ChatRequest::simple(model, prompt)).await?;
        Ok(response.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{Message, Stance};

    #[test]
    fn test_request_preserves_transcript_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::system("argue left", "m1", Stance::Left));
        transcript.push(Message::user("Topic"));
        transcript.push(Message::assistant("Opening", "m1", Stance::Left));

        let request = ChatRequest::from_transcript(&transcript, "m2", GenerationParams::default());
        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();

        assert_eq!(request.model, "m2");
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(request.messages[2].content, "Opening");
    }

    #[test]
    fn test_empty_response_detection() {
        let response = ChatResponse {
            content: Some("   ".to_string()),
            model: "m".to_string(),
            tokens_used: None,
            latency_ms: 0,
        };
        assert!(response.is_empty());
        assert_eq!(response.text_or("fallback"), "fallback");
    }

    #[test]
    fn test_error_status() {
        let err = LlmError::RequestFailed {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));
        assert_eq!(LlmError::ConnectionFailed("refused".into()).status(), None);
    }
}
