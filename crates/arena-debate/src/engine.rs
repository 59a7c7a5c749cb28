//! Turn engine
//!
//! Generates debate turns one at a time. Each call serializes the full
//! transcript for the persona whose turn it is, asks the provider for a
//! completion and appends the reply.
//!
//! A failed completion leaves the transcript and the speaker cursor untouched,
//! so the same persona is asked again on the next call. After
//! [`EngineConfig::max_errors`] consecutive failures the session is marked
//! failed and refuses further turns without contacting the provider.

use std::sync::Arc;

use arena_core::{ArgumentStructure, GenerationParams, Message, PersonaId};
use arena_llm::{ChatRequest, LlmError, LlmProvider};
use thiserror::Error;

use crate::session::DebateSession;

/// Content stored in place of an empty completion
pub const EMPTY_RESPONSE_SENTINEL: &str = "The AI model returned an empty response.";

/// Errors from generating a turn
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Debate session failed after {errors} consecutive errors; start a new session")]
    SessionFailed { errors: u32 },
    #[error("No debate topic has been set")]
    NoTopic,
    #[error("Debate topic must not be empty")]
    EmptyTopic,
    #[error("Error generating response from {persona}: {source}")]
    Provider {
        persona: PersonaId,
        #[source]
        source: LlmError,
    },
}

/// Configuration for the turn engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Consecutive provider failures that end a session
    pub max_errors: u32,
    /// Sampling knobs sent with every request
    pub params: GenerationParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_errors: 3,
            params: GenerationParams::default(),
        }
    }
}

/// Result of generating several turns in a row
#[derive(Debug)]
pub struct RunOutcome {
    /// Messages appended, in order
    pub messages: Vec<Message>,
    /// The error that stopped the run early, if any
    pub error: Option<TurnError>,
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Drives turns for any number of sessions through one provider
#[derive(Debug)]
pub struct DebateEngine<P: LlmProvider + ?Sized> {
    provider: Arc<P>,
    config: EngineConfig,
}

impl<P: LlmProvider + ?Sized> DebateEngine<P> {
    /// Create a new engine
    pub fn new(provider: Arc<P>, config: EngineConfig) -> Self {
        Self { provider, config }
    }

    /// Create with default config
    pub fn with_defaults(provider: Arc<P>) -> Self {
        Self::new(provider, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// The request the next turn would send
    pub fn build_request(&self, session: &DebateSession) -> ChatRequest {
        ChatRequest::from_transcript(
            session.transcript(),
            &session.next_speaker().model,
            self.config.params,
        )
    }

    /// Generate one turn for the persona whose turn it is
    ///
    /// On success exactly one assistant message is appended and returned.
    pub async fn generate_turn(&self, session: &mut DebateSession) -> Result<Message, TurnError> {
        if session.is_failed() {
            tracing::warn!(session = %session.id, "Turn rejected: session has failed");
            return Err(TurnError::SessionFailed {
                errors: session.consecutive_errors(),
            });
        }

        let topic = session.topic().ok_or(TurnError::NoTopic)?.to_string();
        let persona = session.next_speaker().clone();
        let request = self.build_request(session);

        let argument = ArgumentStructure::build(&persona, &topic);
        let strength = argument.strength(&session.dynamics_for(&persona.id));

        tracing::debug!(
            session = %session.id,
            persona = %persona.id,
            model = %persona.model,
            messages = request.messages.len(),
            "Requesting completion"
        );

        match self.provider.complete(request).await {
            Ok(response) => {
                let empty = response.is_empty();
                if empty {
                    tracing::warn!(persona = %persona.id, model = %persona.model, "Empty completion, storing sentinel");
                }

                let mut message = Message::assistant(
                    response.text_or(EMPTY_RESPONSE_SENTINEL),
                    &persona.model,
                    persona.stance,
                )
                .with_metadata("persona_id", &persona.id)
                .with_metadata("persona_name", &persona.name)
                .with_metadata("phase", session.phase())
                .with_metadata("turn", session.turn_count() + 1)
                .with_metadata("argument_strength", format!("{:.3}", strength))
                .with_metadata("latency_ms", response.latency_ms);
                if empty {
                    message = message.with_metadata("empty_completion", true);
                }

                session.record_turn(message.clone());

                tracing::info!(
                    session = %session.id,
                    persona = %persona.id,
                    turn = session.turn_count(),
                    phase = %session.phase(),
                    latency_ms = response.latency_ms,
                    "Turn generated"
                );
                Ok(message)
            }
            Err(e) => {
                if session.record_failure(self.config.max_errors) {
                    tracing::error!(
                        session = %session.id,
                        persona = %persona.id,
                        errors = session.consecutive_errors(),
                        error = %e,
                        "Debate session failed"
                    );
                } else {
                    tracing::warn!(
                        session = %session.id,
                        persona = %persona.id,
                        errors = session.consecutive_errors(),
                        error = %e,
                        "Turn failed"
                    );
                }

                Err(TurnError::Provider {
                    persona: persona.id,
                    source: e,
                })
            }
        }
    }

    /// Generate up to `turns` turns, stopping at the first error
    pub async fn run(&self, session: &mut DebateSession, turns: usize) -> RunOutcome {
        let mut messages = Vec::with_capacity(turns);

        for _ in 0..turns {
            match self.generate_turn(session).await {
                Ok(message) => messages.push(message),
                Err(e) => {
                    return RunOutcome {
                        messages,
                        error: Some(e),
                    }
                }
            }
        }

        RunOutcome {
            messages,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{PersonaRegistry, Role, Stance};
    use arena_llm::MockProvider;

    fn started_session() -> DebateSession {
        let mut session = DebateSession::with_seed(PersonaRegistry::builtin(), 3);
        session.add_user_message("Should the voting age be 16?").unwrap();
        session
    }

    #[tokio::test]
    async fn test_turn_is_stamped() {
        let engine = DebateEngine::with_defaults(Arc::new(MockProvider::constant("Yes.")));
        let mut session = started_session();

        let message = engine.generate_turn(&mut session).await.unwrap();

        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.stance, Some(Stance::Left));
        assert_eq!(message.speaker_model, "deepseek-ai/DeepSeek-V3");
        assert_eq!(message.meta("persona_id"), Some("progressive"));
        assert_eq!(message.meta("persona_name"), Some("Progressive Advocate"));
        assert_eq!(message.meta("phase"), Some("opening"));
        assert_eq!(message.meta("turn"), Some("1"));
        assert!(message.meta_f64("argument_strength").is_some());
        assert_eq!(session.transcript().last(), Some(&message));
    }

    #[tokio::test]
    async fn test_no_topic() {
        let provider = Arc::new(MockProvider::constant("unused"));
        let engine = DebateEngine::with_defaults(provider.clone());
        let mut session = DebateSession::with_seed(PersonaRegistry::builtin(), 3);

        assert!(matches!(engine.generate_turn(&mut session).await, Err(TurnError::NoTopic)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_uses_speaker_model_and_full_transcript() {
        let engine = DebateEngine::with_defaults(Arc::new(MockProvider::constant("ok")));
        let mut session = started_session();
        engine.generate_turn(&mut session).await.unwrap();

        let request = engine.build_request(&session);
        assert_eq!(request.model, "Qwen/Qwen2.5-32B-Instruct");
        assert_eq!(request.messages.len(), session.transcript().len());
        assert_eq!(request.params, GenerationParams::default());
    }

    #[tokio::test]
    async fn test_failure_keeps_speaker() {
        let engine = DebateEngine::with_defaults(Arc::new(MockProvider::failing("reset by peer")));
        let mut session = started_session();
        let before = session.transcript().len();

        let err = engine.generate_turn(&mut session).await.unwrap_err();

        assert!(err.to_string().contains("progressive"));
        assert_eq!(session.transcript().len(), before);
        assert_eq!(session.next_speaker().id, "progressive");
        assert_eq!(session.consecutive_errors(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_at_first_error() {
        use arena_llm::MockReply;

        let provider = MockProvider::scripted(vec![
            MockReply::Text("one".into()),
            MockReply::Text("two".into()),
            MockReply::Fail("down".into()),
        ]);
        let engine = DebateEngine::with_defaults(Arc::new(provider));
        let mut session = started_session();

        let outcome = engine.run(&mut session, 5).await;
        assert_eq!(outcome.messages.len(), 2);
        assert!(matches!(outcome.error, Some(TurnError::Provider { .. })));
        assert!(!outcome.is_complete());
    }
}
