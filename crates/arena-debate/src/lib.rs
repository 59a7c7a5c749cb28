//! # Arena Debate
//!
//! Turn-taking and phase progression for debates between AI personas.
//!
//! ## Key Types
//!
//! - [`DebateSession`] - owns the transcript, speaker cursor, phase and error counters
//! - [`DebateEngine`] - generates one turn at a time through an [`arena_llm::LlmProvider`]
//! - [`DebateAnalysis`] - derived statistics over a session's transcript
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arena_core::{DebatePhase, PersonaRegistry};
//! use arena_debate::{DebateEngine, DebateSession};
//! use arena_llm::MockProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let engine = DebateEngine::with_defaults(Arc::new(MockProvider::debate()));
//!     let mut session = DebateSession::with_seed(PersonaRegistry::builtin(), 42);
//!
//!     session.add_user_message("Should college be free?").unwrap();
//!     let outcome = engine.run(&mut session, 3).await;
//!
//!     assert!(outcome.error.is_none());
//!     assert_eq!(session.phase(), DebatePhase::Exploration);
//! }
//! ```

pub mod analytics;
pub mod engine;
pub mod session;

pub use analytics::{emotional_score, intensity_markers, DebateAnalysis};
pub use engine::{DebateEngine, EngineConfig, RunOutcome, TurnError, EMPTY_RESPONSE_SENTINEL};
pub use session::{DebateSession, SessionError, SessionStatus};
