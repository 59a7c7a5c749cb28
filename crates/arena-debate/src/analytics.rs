//! Derived debate statistics
//!
//! Everything here is a pure function of the session's transcript, personas
//! and seeded dynamics. The scores are fixed-weight keyword heuristics; they
//! are stable for a given transcript and grow one entry per assistant message.

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{DebatePhase, PersonaConfig, PersonaId, PersonalityDynamics};
use serde::{Deserialize, Serialize};

use crate::session::DebateSession;

const TRIGGER_WEIGHT: f64 = 0.25;
const MARKER_WEIGHT: f64 = 0.1;
const EXCLAMATION_WEIGHT: f64 = 0.05;

/// Absolute or universal wording
const ABSOLUTE_MARKERS: [&str; 6] = ["always", "never", "every ", "no one", "nobody", "all "];

/// Loaded or emotional wording
const LOADED_MARKERS: [&str; 10] = [
    "obvious",
    "clearly",
    "undeniable",
    "absolutely",
    "certainly",
    "must",
    "disaster",
    "outrageous",
    "betray",
    "destroy",
];

/// Intensity markers present in `text`
///
/// One entry per marker category found; loaded language reports the first
/// matching word only.
pub fn intensity_markers(text: &str) -> Vec<String> {
    let mut markers = Vec::new();
    let lower = text.to_lowercase();

    if ABSOLUTE_MARKERS.iter().any(|m| lower.contains(m)) {
        markers.push("Absolute wording".to_string());
    }

    if let Some(word) = LOADED_MARKERS.iter().find(|m| lower.contains(*m)) {
        markers.push(format!("Loaded language ('{}')", word));
    }

    if text.contains('!') {
        markers.push("Exclamation".to_string());
    }

    // Shouting: long runs of capitals
    let letters = text.chars().filter(|c| c.is_alphabetic()).count();
    let capitals = text.chars().filter(|c| c.is_uppercase()).count();
    if letters >= 20 && capitals * 3 > letters {
        markers.push("Shouting".to_string());
    }

    markers
}

/// Emotional intensity of one message in `[0, 1]`
///
/// Counts the persona's own trigger phrases (weighted by its trigger
/// sensitivity), each [`intensity_markers`] category, and exclamation marks.
pub fn emotional_score(text: &str, persona: &PersonaConfig, dynamics: &PersonalityDynamics) -> f64 {
    let lower = text.to_lowercase();

    let trigger_hits = persona
        .trigger_phrases
        .iter()
        .filter(|t| lower.contains(&t.to_lowercase()))
        .count() as f64;
    let marker_hits = intensity_markers(text).len() as f64;
    let exclamations = text.matches('!').count() as f64;

    let score = TRIGGER_WEIGHT * trigger_hits * (0.5 + dynamics.trigger_sensitivity)
        + MARKER_WEIGHT * marker_hits
        + EXCLAMATION_WEIGHT * exclamations;

    score.clamp(0.0, 1.0)
}

/// Snapshot of a debate's derived statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateAnalysis {
    pub phase: DebatePhase,
    pub turn_count: u32,
    /// Non-system messages
    pub message_count: usize,
    /// Per persona, one emotional score per assistant message
    pub emotional_trajectory: BTreeMap<PersonaId, Vec<f64>>,
    /// Per persona, mean argument strength of its messages
    pub argument_effectiveness: BTreeMap<PersonaId, f64>,
    /// Per persona, distinct intensity markers across its messages
    #[serde(default)]
    pub intensity_markers: BTreeMap<PersonaId, Vec<String>>,
    /// Key points collected per stance
    pub stance_summary: BTreeMap<String, Vec<String>>,
}

impl DebateAnalysis {
    pub fn from_session(session: &DebateSession) -> Self {
        let transcript = session.transcript();
        let mut emotional_trajectory = BTreeMap::new();
        let mut argument_effectiveness = BTreeMap::new();
        let mut markers_by_persona = BTreeMap::new();

        for persona in session.registry().list_personas() {
            let dynamics = session.dynamics_for(&persona.id);

            let trajectory: Vec<f64> = transcript
                .spoken_by(&persona.id)
                .map(|m| emotional_score(&m.content, persona, &dynamics))
                .collect();

            let strengths: Vec<f64> = transcript
                .spoken_by(&persona.id)
                .filter_map(|m| m.meta_f64("argument_strength"))
                .collect();
            let effectiveness = if strengths.is_empty() {
                0.0
            } else {
                strengths.iter().sum::<f64>() / strengths.len() as f64
            };

            let markers: BTreeSet<String> = transcript
                .spoken_by(&persona.id)
                .flat_map(|m| intensity_markers(&m.content))
                .collect();

            emotional_trajectory.insert(persona.id.clone(), trajectory);
            argument_effectiveness.insert(persona.id.clone(), effectiveness);
            markers_by_persona.insert(persona.id.clone(), markers.into_iter().collect());
        }

        Self {
            phase: session.phase(),
            turn_count: session.turn_count(),
            message_count: transcript.visible_count(),
            emotional_trajectory,
            argument_effectiveness,
            intensity_markers: markers_by_persona,
            stance_summary: session.stance_summary().clone(),
        }
    }

    /// The last `n` emotional scores of a persona
    pub fn recent_trajectory(&self, persona_id: &str, n: usize) -> &[f64] {
        match self.emotional_trajectory.get(persona_id) {
            Some(scores) => &scores[scores.len().saturating_sub(n)..],
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_markers() {
        let markers = intensity_markers("This is clearly a disaster and it always will be!");
        assert!(markers.iter().any(|m| m == "Absolute wording"));
        assert!(markers.iter().any(|m| m.contains("clearly")));
        assert!(markers.iter().any(|m| m == "Exclamation"));

        assert!(intensity_markers("Transit ridership rose four percent last year.").is_empty());
    }

    #[test]
    fn test_emotional_score_uses_triggers_and_sensitivity() {
        let persona = PersonaConfig::progressive();
        let calm = PersonalityDynamics { trigger_sensitivity: 0.0, ..PersonalityDynamics::neutral() };
        let touchy = PersonalityDynamics { trigger_sensitivity: 1.0, ..PersonalityDynamics::neutral() };
        let text = "They call it deregulation, but it means fewer protections.";

        let low = emotional_score(text, &persona, &calm);
        let high = emotional_score(text, &persona, &touchy);
        assert!(low > 0.0);
        assert!(high > low);
        assert_eq!(emotional_score("Bus lanes move more people.", &persona, &touchy), 0.0);
    }

    #[test]
    fn test_emotional_score_is_clamped() {
        let persona = PersonaConfig::conservative();
        let text = "Redistribution! Regulation! Big government! Always! Never! Clearly a disaster!!!";
        let score = emotional_score(text, &persona, &PersonalityDynamics::neutral());
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_emotional_score_counts_marker_categories() {
        let persona = PersonaConfig::progressive();
        let dynamics = PersonalityDynamics::neutral();

        // Two loaded words fall in one category
        let one = emotional_score("This is clearly obvious.", &persona, &dynamics);
        assert!((one - MARKER_WEIGHT).abs() < 1e-9);

        let two = emotional_score("This is clearly what we always do.", &persona, &dynamics);
        assert!((two - 2.0 * MARKER_WEIGHT).abs() < 1e-9);
    }
}
