//! OpenAI-compatible chat-completion provider
//!
//! Works against any endpoint that speaks the `/chat/completions` format
//! (Nebius AI Studio, OpenAI, DeepSeek, local gateways).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::config::{ConfigError, LlmConfig};
use crate::provider::{ChatMessage, ChatRequest, ChatResponse, LlmError, LlmProvider};

/// Wire request format
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

/// Wire response format
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// Provider for OpenAI-compatible chat-completion endpoints
#[derive(Debug)]
pub struct OpenAiCompatibleProvider {
    /// Full chat-completions URL
    endpoint: String,
    /// Bearer token
    api_key: String,
    /// HTTP client
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create a provider for `endpoint` (the full `/chat/completions` URL)
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Nebius AI Studio
    pub fn nebius(api_key: &str) -> Self {
        Self::new(LlmConfig::DEFAULT_API_BASE, api_key)
    }

    /// Build from configuration, applying its request timeout
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let api_key = config.require_api_key()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.api_base.clone(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn models_url(&self) -> String {
        let base = self
            .endpoint
            .trim_end_matches('/')
            .trim_end_matches("/chat/completions");
        format!("{}/models", base)
    }
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(e.to_string())
    } else {
        LlmError::ConnectionFailed(e.to_string())
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(self.models_url())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .is_ok()
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let start = Instant::now();

        let body = CompletionRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.params.max_tokens,
            temperature: request.params.temperature,
            top_p: request.params.top_p,
            frequency_penalty: request.params.frequency_penalty,
            presence_penalty: request.params.presence_penalty,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, model = %request.model, "Completion request failed");
            if status.as_u16() == 429 {
                return Err(LlmError::RateLimited);
            }
            return Err(LlmError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await.map_err(transport_error)?;
        let api_response: CompletionResponse = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(error = %e, body = %raw, "Unparseable completion response");
            LlmError::InvalidResponse(e.to_string())
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty());

        if content.is_none() {
            tracing::warn!(model = %request.model, body = %raw, "Endpoint returned an empty completion");
        }

        Ok(ChatResponse {
            content,
            model: api_response.model.unwrap_or(request.model),
            tokens_used: api_response.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_url() {
        let provider = OpenAiCompatibleProvider::nebius("key");
        assert_eq!(provider.models_url(), "https://api.studio.nebius.ai/v1/models");
    }

    #[test]
    fn test_from_config_requires_key() {
        let config = LlmConfig::default();
        assert!(matches!(
            OpenAiCompatibleProvider::from_config(&config),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }
}
