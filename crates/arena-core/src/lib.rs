//! # Arena Core
//!
//! Core types shared by every Arena crate:
//! - [`Message`] and [`Transcript`] - the append-only debate record
//! - [`PersonaConfig`] and [`PersonaRegistry`] - who takes part, and in what order
//! - [`DebatePhase`] - the coarse phase state machine
//! - [`PersonalityDynamics`] and [`GenerationParams`] - per-persona traits and
//!   the sampling knobs sent to the completion endpoint
//! - [`ArgumentStructure`] - per-turn argument scaffolding

pub mod argument;
pub mod dynamics;
pub mod message;
pub mod persona;
pub mod phase;

pub use argument::ArgumentStructure;
pub use dynamics::{GenerationParams, PersonalityDynamics};
pub use message::{Message, Role, Stance, Transcript};
pub use persona::{PersonaConfig, PersonaId, PersonaRegistry, RegistryError, RhetoricalStyle};
pub use phase::DebatePhase;
