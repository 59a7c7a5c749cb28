//! Mock LLM provider for testing and offline runs

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::provider::{ChatRequest, ChatResponse, LlmError, LlmProvider};

/// One scripted outcome of a mock completion call
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Successful completion with this text
    Text(String),
    /// Successful completion with no choices
    Empty,
    /// Transport failure with this message
    Fail(String),
}

/// A mock LLM provider that plays back a script of outcomes
///
/// The script cycles; every call is counted so tests can assert that a
/// rejected turn never reached the provider.
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    /// Scripted outcomes (cycles through them)
    script: Vec<MockReply>,
    /// Number of completed calls
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock from a script of outcomes
    pub fn scripted(script: Vec<MockReply>) -> Self {
        Self {
            name: "mock".to_string(),
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that cycles through canned replies
    pub fn new(responses: Vec<String>) -> Self {
        Self::scripted(responses.into_iter().map(MockReply::Text).collect())
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock whose every call fails
    pub fn failing(message: &str) -> Self {
        Self::scripted(vec![MockReply::Fail(message.to_string())])
    }

    /// Create a mock whose every call returns an empty choices list
    pub fn empty() -> Self {
        Self::scripted(vec![MockReply::Empty])
    }

    /// Canned back-and-forth for offline debates
    pub fn debate() -> Self {
        Self::new(vec![
            "Inequality is not an accident, it is the predictable result of deregulation. \
             Public investment built the middle class and only public investment will rebuild it."
                .to_string(),
            "Every wave of regulation promises fairness and delivers higher prices. \
             Big government crowds out the small businesses that actually create jobs."
                .to_string(),
            "The free market has never priced in pollution or poverty on its own. \
             Clearly we need rules that make the powerful pay their share!"
                .to_string(),
            "Redistribution punishes the people who build things. \
             History shows that lower taxes and open markets lift far more families out of poverty."
                .to_string(),
        ])
        .with_name("debate-mock")
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// How many times `complete` has been called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let start = Instant::now();
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = if self.script.is_empty() {
            MockReply::Empty
        } else {
            self.script[idx % self.script.len()].clone()
        };

        let content = match reply {
            MockReply::Text(text) => Some(text),
            MockReply::Empty => None,
            MockReply::Fail(message) => return Err(LlmError::ConnectionFailed(message)),
        };

        let prompt_chars: usize = request.messages.iter().map(|m| m.content.len()).sum();
        Ok(ChatResponse {
            content,
            model: request.model,
            tokens_used: Some((prompt_chars / 4) as u32 + 100),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider() {
        let mock = MockProvider::constant("Hello, world!");
        let response = mock.ask("mock-model", "test").await.unwrap();
        assert_eq!(response, "Hello, world!");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_script_cycles() {
        let mock = MockProvider::scripted(vec![
            MockReply::Text("first".to_string()),
            MockReply::Empty,
            MockReply::Fail("boom".to_string()),
        ]);

        assert_eq!(mock.ask("m", "a").await.unwrap(), "first");
        assert_eq!(mock.ask("m", "b").await.unwrap(), "");
        assert!(matches!(mock.ask("m", "c").await, Err(LlmError::ConnectionFailed(_))));
        assert_eq!(mock.ask("m", "d").await.unwrap(), "first");
        assert_eq!(mock.call_count(), 4);
    }
}
