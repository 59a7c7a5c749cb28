//! Configuration management for Arena
//!
//! Handles the API key, endpoint and the generation parameters sent with
//! every completion request.

use arena_core::GenerationParams;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Response client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (env: NEBIUS_API_KEY, falling back to ARENA_API_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Full chat-completions URL (env: ARENA_API_BASE)
    pub api_base: String,
    /// Sampling knobs (env: ARENA_MAX_TOKENS, ARENA_TEMPERATURE, ARENA_TOP_P,
    /// ARENA_FREQUENCY_PENALTY, ARENA_PRESENCE_PENALTY)
    pub params: GenerationParams,
    /// HTTP timeout in seconds (env: ARENA_TIMEOUT_SECS)
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: Self::DEFAULT_API_BASE.to_string(),
            params: GenerationParams::default(),
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    /// Nebius AI Studio chat-completions endpoint
    pub const DEFAULT_API_BASE: &'static str = "https://api.studio.nebius.ai/v1/chat/completions";

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let params = GenerationParams {
            max_tokens: parse_var(&lookup, "ARENA_MAX_TOKENS")?.unwrap_or(defaults.params.max_tokens),
            temperature: parse_var(&lookup, "ARENA_TEMPERATURE")?.unwrap_or(defaults.params.temperature),
            top_p: parse_var(&lookup, "ARENA_TOP_P")?.unwrap_or(defaults.params.top_p),
            frequency_penalty: parse_var(&lookup, "ARENA_FREQUENCY_PENALTY")?
                .unwrap_or(defaults.params.frequency_penalty),
            presence_penalty: parse_var(&lookup, "ARENA_PRESENCE_PENALTY")?
                .unwrap_or(defaults.params.presence_penalty),
        };

        Ok(Self {
            api_key: lookup("NEBIUS_API_KEY")
                .or_else(|| lookup("ARENA_API_KEY"))
                .filter(|k| !k.trim().is_empty()),
            api_base: lookup("ARENA_API_BASE").unwrap_or(defaults.api_base),
            params,
            timeout_secs: parse_var(&lookup, "ARENA_TIMEOUT_SECS")?.unwrap_or(defaults.timeout_secs),
        })
    }

    /// The API key, or an error naming the variable to set
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("NEBIUS_API_KEY".to_string()))
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{} has invalid value '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = LlmConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base, LlmConfig::DEFAULT_API_BASE);
        assert_eq!(config.params, GenerationParams::default());
        assert!(!config.is_configured());
        assert!(config.require_api_key().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = LlmConfig::from_lookup(lookup_from(&[
            ("ARENA_API_KEY", "secret"),
            ("ARENA_MAX_TOKENS", "800"),
            ("ARENA_TOP_P", "0.95"),
            ("ARENA_API_BASE", "http://localhost:8080/v1/chat/completions"),
        ]))
        .unwrap();

        assert_eq!(config.require_api_key().unwrap(), "secret");
        assert_eq!(config.params.max_tokens, 800);
        assert!((config.params.top_p - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.api_base, "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_nebius_key_wins() {
        let config = LlmConfig::from_lookup(lookup_from(&[
            ("NEBIUS_API_KEY", "nebius"),
            ("ARENA_API_KEY", "arena"),
        ]))
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("nebius"));
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = LlmConfig::from_lookup(lookup_from(&[("ARENA_TEMPERATURE", "hot")])).unwrap_err();
        assert!(err.to_string().contains("ARENA_TEMPERATURE"));
    }
}
