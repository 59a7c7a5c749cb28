//! Per-turn argument scaffolding
//!
//! An [`ArgumentStructure`] is assembled from the speaking persona's beliefs
//! each turn and discarded afterwards. Its strength is a fixed-weight
//! placeholder score, not a model of argument quality.

use serde::{Deserialize, Serialize};

use crate::dynamics::PersonalityDynamics;
use crate::persona::PersonaConfig;

const PREMISE_TARGET: usize = 3;
const EVIDENCE_TARGET: usize = 2;
const REBUTTAL_TARGET: usize = 2;

/// Premises, conclusion and backing for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentStructure {
    pub premises: Vec<String>,
    pub conclusion: String,
    pub evidence: Vec<String>,
    pub counter_arguments: Vec<String>,
    /// Beliefs held back in case the main line is rebutted
    pub fallback_positions: Vec<String>,
}

impl ArgumentStructure {
    /// Assemble the argument a persona would make on `topic`
    pub fn build(persona: &PersonaConfig, topic: &str) -> Self {
        let premises: Vec<String> = persona
            .core_beliefs
            .iter()
            .take(PREMISE_TARGET)
            .cloned()
            .collect();

        let fallback_positions = persona
            .core_beliefs
            .iter()
            .skip(PREMISE_TARGET)
            .cloned()
            .collect();

        let conclusion = match premises.first() {
            Some(lead) => format!("On \"{}\", the {} position holds: {}", topic, persona.stance, lead),
            None => format!("On \"{}\", the {} position holds", topic, persona.stance),
        };

        let evidence = persona
            .expertise_areas
            .iter()
            .take(EVIDENCE_TARGET)
            .map(|area| format!("Findings from {}", area))
            .collect();

        let counter_arguments = persona
            .counter_arguments_for(topic)
            .into_iter()
            .map(str::to_string)
            .collect();

        Self {
            premises,
            conclusion,
            evidence,
            counter_arguments,
            fallback_positions,
        }
    }

    /// Placeholder strength score in `[0, 1]`
    ///
    /// Weights: premises 0.35, evidence 0.25, prepared rebuttals 0.15,
    /// persona confidence 0.25.
    pub fn strength(&self, dynamics: &PersonalityDynamics) -> f64 {
        let premise = ratio(self.premises.len(), PREMISE_TARGET);
        let evidence = ratio(self.evidence.len(), EVIDENCE_TARGET);
        let rebuttal = ratio(self.counter_arguments.len(), REBUTTAL_TARGET);

        (0.35 * premise + 0.25 * evidence + 0.15 * rebuttal + 0.25 * dynamics.confidence_level)
            .clamp(0.0, 1.0)
    }
}

fn ratio(have: usize, target: usize) -> f64 {
    (have as f64 / target as f64).min(1.0)
}
