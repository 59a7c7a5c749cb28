//! Debate session state
//!
//! A [`DebateSession`] owns everything about one debate: the transcript, the
//! speaker cursor, the phase, error counters and per-persona dynamics. Nothing
//! is shared between sessions. Mutation during a turn happens only through
//! [`crate::DebateEngine`].

use std::collections::BTreeMap;

use arena_core::{
    DebatePhase, Message, PersonaConfig, PersonaId, PersonaRegistry, PersonalityDynamics, Role,
    Transcript,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::analytics::DebateAnalysis;
use crate::engine::TurnError;

/// Key points kept per stance, per message
const KEY_POINTS_PER_MESSAGE: usize = 3;
/// Sentences need more words than this to count as a key point
const KEY_POINT_MIN_WORDS: usize = 5;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Seeded, no topic yet
    AwaitingTopic,
    /// Accepting turns
    Active,
    /// Too many consecutive provider failures; needs a new session
    Failed,
}

/// A saved session that contradicts its own persona registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Speaker cursor {index} is out of range for {personas} personas")]
    CursorOutOfRange { index: usize, personas: usize },
    #[error("Transcript must open with one system message per persona: {0}")]
    SeedMismatch(String),
}

/// One debate's complete state
///
/// Deserializing checks that the speaker cursor and the seeded system
/// messages agree with the persona registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionState")]
pub struct DebateSession {
    /// Unique ID
    pub id: Uuid,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    registry: PersonaRegistry,
    transcript: Transcript,
    topic: Option<String>,
    current_agent_index: usize,
    phase: DebatePhase,
    status: SessionStatus,
    turn_count: u32,
    consecutive_errors: u32,
    total_errors: u32,
    dynamics: BTreeMap<PersonaId, PersonalityDynamics>,
    stance_summary: BTreeMap<String, Vec<String>>,
}

/// Wire form of [`DebateSession`], validated on the way in
#[derive(Deserialize)]
struct SessionState {
    id: Uuid,
    created_at: DateTime<Utc>,
    registry: PersonaRegistry,
    transcript: Transcript,
    topic: Option<String>,
    current_agent_index: usize,
    phase: DebatePhase,
    status: SessionStatus,
    turn_count: u32,
    consecutive_errors: u32,
    total_errors: u32,
    dynamics: BTreeMap<PersonaId, PersonalityDynamics>,
    stance_summary: BTreeMap<String, Vec<String>>,
}

impl TryFrom<SessionState> for DebateSession {
    type Error = SessionError;

    fn try_from(state: SessionState) -> Result<Self, Self::Error> {
        let personas = state.registry.len();
        if state.current_agent_index >= personas {
            return Err(SessionError::CursorOutOfRange {
                index: state.current_agent_index,
                personas,
            });
        }

        let messages = state.transcript.messages();
        if state.transcript.count_role(Role::System) != personas {
            return Err(SessionError::SeedMismatch(format!(
                "found {} system messages for {} personas",
                state.transcript.count_role(Role::System),
                personas
            )));
        }
        for (index, persona) in state.registry.list_personas().iter().enumerate() {
            let seeded = messages
                .get(index)
                .filter(|m| m.role == Role::System)
                .and_then(|m| m.meta("persona_id"));
            if seeded != Some(persona.id.as_str()) {
                return Err(SessionError::SeedMismatch(format!(
                    "position {} is not the system message for '{}'",
                    index, persona.id
                )));
            }
        }

        Ok(Self {
            id: state.id,
            created_at: state.created_at,
            registry: state.registry,
            transcript: state.transcript,
            topic: state.topic,
            current_agent_index: state.current_agent_index,
            phase: state.phase,
            status: state.status,
            turn_count: state.turn_count,
            consecutive_errors: state.consecutive_errors,
            total_errors: state.total_errors,
            dynamics: state.dynamics,
            stance_summary: state.stance_summary,
        })
    }
}

impl DebateSession {
    /// Create a session, seeding one system message per persona
    ///
    /// Personality dynamics are drawn from `rng` in registry order.
    pub fn new<R: Rng + ?Sized>(registry: PersonaRegistry, rng: &mut R) -> Self {
        let mut transcript = Transcript::new();
        let mut dynamics = BTreeMap::new();

        for persona in registry.list_personas() {
            transcript.push(
                Message::system(persona.debate_prompt(), &persona.model, persona.stance)
                    .with_metadata("persona_id", &persona.id),
            );
            dynamics.insert(persona.id.clone(), PersonalityDynamics::seeded(rng));
        }

        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            registry,
            transcript,
            topic: None,
            current_agent_index: 0,
            phase: DebatePhase::Opening,
            status: SessionStatus::AwaitingTopic,
            turn_count: 0,
            consecutive_errors: 0,
            total_errors: 0,
            dynamics,
            stance_summary: BTreeMap::new(),
        };

        tracing::debug!(session = %session.id, personas = session.registry.len(), "Debate session created");
        session
    }

    /// Create a session with dynamics drawn from a fixed seed
    pub fn with_seed(registry: PersonaRegistry, seed: u64) -> Self {
        Self::new(registry, &mut StdRng::seed_from_u64(seed))
    }

    /// Create a session with dynamics drawn from OS entropy
    pub fn from_entropy(registry: PersonaRegistry) -> Self {
        Self::new(registry, &mut StdRng::from_entropy())
    }

    /// Append a user message and restart the speaking order
    ///
    /// The first call sets the debate topic and activates the session.
    pub fn add_user_message(&mut self, content: &str) -> Result<(), TurnError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(TurnError::EmptyTopic);
        }

        self.transcript.push(Message::user(content));
        if self.topic.is_none() {
            self.topic = Some(content.to_string());
        }
        self.current_agent_index = 0;
        if self.status == SessionStatus::AwaitingTopic {
            self.status = SessionStatus::Active;
        }

        tracing::info!(session = %self.id, topic = %content, "User message added");
        Ok(())
    }

    /// The persona whose turn it is, without advancing
    pub fn next_speaker(&self) -> &PersonaConfig {
        self.registry.at(self.current_agent_index)
    }

    /// Return the persona whose turn it is and advance the cursor
    pub fn select_next_speaker(&mut self) -> PersonaId {
        let id = self.next_speaker().id.clone();
        self.current_agent_index = (self.current_agent_index + 1) % self.registry.len();
        id
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub fn phase(&self) -> DebatePhase {
        self.phase
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_failed(&self) -> bool {
        self.status == SessionStatus::Failed
    }

    pub fn current_agent_index(&self) -> usize {
        self.current_agent_index
    }

    /// Successful turns so far
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn total_errors(&self) -> u32 {
        self.total_errors
    }

    /// Seeded dynamics for a persona (neutral if the id is unknown)
    pub fn dynamics_for(&self, persona_id: &str) -> PersonalityDynamics {
        self.dynamics.get(persona_id).copied().unwrap_or_default()
    }

    /// Key points collected per stance (`"left"` / `"right"`)
    pub fn stance_summary(&self) -> &BTreeMap<String, Vec<String>> {
        &self.stance_summary
    }

    /// Derived statistics over the current transcript
    pub fn analysis(&self) -> DebateAnalysis {
        DebateAnalysis::from_session(self)
    }

    /// Append a successful turn and run the per-turn bookkeeping
    pub(crate) fn record_turn(&mut self, message: Message) {
        self.summarize_stance(&message);
        self.transcript.push(message);
        self.turn_count += 1;
        self.consecutive_errors = 0;
        self.select_next_speaker();
        self.advance_phase();
    }

    /// Count a failed turn; returns true when this failure ends the session
    pub(crate) fn record_failure(&mut self, max_errors: u32) -> bool {
        self.consecutive_errors += 1;
        self.total_errors += 1;

        if self.consecutive_errors >= max_errors && self.status != SessionStatus::Failed {
            self.status = SessionStatus::Failed;
            return true;
        }
        false
    }

    /// Take at most one phase step based on the assistant-message count
    fn advance_phase(&mut self) -> Option<DebatePhase> {
        let next = self.phase.transition(self.transcript.assistant_count())?;
        tracing::info!(session = %self.id, from = %self.phase, to = %next, "Debate phase advanced");
        self.phase = next;
        Some(next)
    }

    fn summarize_stance(&mut self, message: &Message) {
        let stance = match message.stance {
            Some(stance) if stance.is_partisan() => stance,
            _ => return,
        };

        let key_points: Vec<String> = message
            .content
            .split('.')
            .map(str::trim)
            .filter(|s| s.split_whitespace().count() > KEY_POINT_MIN_WORDS)
            .take(KEY_POINTS_PER_MESSAGE)
            .map(str::to_string)
            .collect();

        self.stance_summary
            .entry(stance.as_str().to_string())
            .or_default()
            .extend(key_points);
    }
}
