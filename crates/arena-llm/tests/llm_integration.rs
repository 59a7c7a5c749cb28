//! Integration tests that require a real completion endpoint
//!
//! These tests are marked with #[ignore] and require NEBIUS_API_KEY
//! (or ARENA_API_KEY plus ARENA_API_BASE for another endpoint).
//!
//! Run with: cargo test -p arena-llm --test llm_integration -- --ignored

use arena_core::PersonaRegistry;
use arena_llm::{LlmConfig, LlmProvider, OpenAiCompatibleProvider};

#[tokio::test]
#[ignore = "Requires NEBIUS_API_KEY"]
async fn test_real_completion_for_each_persona_model() {
    let config = LlmConfig::from_env().expect("valid environment");
    let provider = OpenAiCompatibleProvider::from_config(&config).expect("API key must be set");

    for persona in PersonaRegistry::builtin().list_personas() {
        let reply = provider
            .ask(&persona.model, "Answer with one word: is water wet?")
            .await;
        assert!(reply.is_ok(), "{} should answer: {:?}", persona.model, reply);
        println!("{} -> {}", persona.model, reply.unwrap());
    }
}

#[tokio::test]
#[ignore = "Makes real API call"]
async fn test_invalid_api_key() {
    let provider = OpenAiCompatibleProvider::nebius("invalid-key-12345");

    let err = provider
        .ask("deepseek-ai/DeepSeek-V3", "Hello")
        .await
        .expect_err("should fail with invalid key");
    println!("Expected error: {:?}", err);
    assert!(err.status().is_some());
}
