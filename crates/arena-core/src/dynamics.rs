//! Per-persona personality traits and completion sampling parameters
//!
//! - [`PersonalityDynamics`] are drawn once per session from an injected RNG
//! - [`GenerationParams`] are passed verbatim to the completion endpoint

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Synthetic personality traits, each in `[0, 1]`
///
/// Seeded at session construction and never updated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityDynamics {
    /// How strongly trigger phrases raise emotional intensity
    pub trigger_sensitivity: f64,
    /// How readily the persona shifts its framing
    pub adaptation_rate: f64,
    /// Self-assurance, weighs into argument strength
    pub confidence_level: f64,
    /// How much the persona draws on earlier turns
    pub learning_coefficient: f64,
}

impl PersonalityDynamics {
    /// Draw traits from `rng`
    ///
    /// Use a seeded RNG (e.g. `StdRng::seed_from_u64`) for reproducible sessions.
    pub fn seeded<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            trigger_sensitivity: rng.gen_range(0.3..=0.9),
            adaptation_rate: rng.gen_range(0.1..=0.5),
            confidence_level: rng.gen_range(0.5..=0.95),
            learning_coefficient: rng.gen_range(0.05..=0.3),
        }
    }

    /// Mid-range traits
    pub fn neutral() -> Self {
        Self {
            trigger_sensitivity: 0.5,
            adaptation_rate: 0.5,
            confidence_level: 0.5,
            learning_coefficient: 0.5,
        }
    }

    /// Check every trait lies in `[0, 1]`
    pub fn is_valid(&self) -> bool {
        [
            self.trigger_sensitivity,
            self.adaptation_rate,
            self.confidence_level,
            self.learning_coefficient,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
    }
}

impl Default for PersonalityDynamics {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Sampling knobs for a chat completion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Controls randomness (0.0 = deterministic)
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Penalty for token frequency (-2.0 to 2.0)
    pub frequency_penalty: f32,
    /// Penalty for tokens already present (-2.0 to 2.0)
    pub presence_penalty: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.9,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl GenerationParams {
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeded_dynamics_are_reproducible() {
        let a = PersonalityDynamics::seeded(&mut StdRng::seed_from_u64(7));
        let b = PersonalityDynamics::seeded(&mut StdRng::seed_from_u64(7));
        let c = PersonalityDynamics::seeded(&mut StdRng::seed_from_u64(8));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is_valid());
        assert!(c.is_valid());
    }

    #[test]
    fn test_default_params() {
        let params = GenerationParams::default();
        assert_eq!(params.max_tokens, 500);
        assert!((params.temperature - 0.9).abs() < f32::EPSILON);
    }
}
