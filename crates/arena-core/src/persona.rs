//! Persona definitions and the ordered persona registry
//!
//! The registry is fixed at startup; its order defines the speaking order.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::message::Stance;

/// Stable identifier for a persona (e.g. `"progressive"`)
pub type PersonaId = String;

/// How a persona prefers to argue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RhetoricalStyle {
    /// Evidence and systemic reasoning
    Analytical,
    /// Costs, incentives and precedent
    Pragmatic,
}

impl RhetoricalStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analytical => "analytical",
            Self::Pragmatic => "pragmatic",
        }
    }

    /// Short instruction appended to the persona's debate prompt
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Analytical => "Build each point from data, studies and systemic causes.",
            Self::Pragmatic => "Argue from costs, incentives and what has worked before.",
        }
    }
}

impl fmt::Display for RhetoricalStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for one debating persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Registry key
    pub id: PersonaId,
    /// Human-readable name
    pub name: String,
    /// Model identifier sent to the completion endpoint
    pub model: String,
    /// Side this persona argues
    pub stance: Stance,
    /// Preferred rhetorical style
    pub rhetorical_style: RhetoricalStyle,
    /// Persona instructions
    pub system_prompt: String,
    /// Phrases from the opponent that provoke this persona
    pub trigger_phrases: Vec<String>,
    /// Beliefs the persona argues from, strongest first
    pub core_beliefs: Vec<String>,
    /// Prepared rebuttals, keyed by topic keyword
    pub counter_arguments: BTreeMap<String, Vec<String>>,
    /// Areas the persona draws evidence from
    pub expertise_areas: Vec<String>,
}

impl PersonaConfig {
    /// Create a persona with empty prompt, beliefs and rebuttals
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        model: impl Into<String>,
        stance: Stance,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
            stance,
            rhetorical_style: RhetoricalStyle::Analytical,
            system_prompt: String::new(),
            trigger_phrases: Vec::new(),
            core_beliefs: Vec::new(),
            counter_arguments: BTreeMap::new(),
            expertise_areas: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: RhetoricalStyle) -> Self {
        self.rhetorical_style = style;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_beliefs<I, S>(mut self, beliefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_beliefs = beliefs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_triggers<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_phrases = triggers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expertise<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expertise_areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Add prepared rebuttals for a topic keyword
    pub fn with_counter_arguments<I, S>(mut self, topic: impl Into<String>, rebuttals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.counter_arguments
            .insert(topic.into(), rebuttals.into_iter().map(Into::into).collect());
        self
    }

    /// Prepared rebuttals whose topic keyword appears in `topic`
    pub fn counter_arguments_for(&self, topic: &str) -> Vec<&str> {
        let topic_lower = topic.to_lowercase();
        self.counter_arguments
            .iter()
            .filter(|(key, _)| topic_lower.contains(&key.to_lowercase()))
            .flat_map(|(_, rebuttals)| rebuttals.iter().map(String::as_str))
            .collect()
    }

    /// The system message seeded into the transcript for this persona
    pub fn debate_prompt(&self) -> String {
        let mut prompt = String::new();
        if !self.system_prompt.is_empty() {
            prompt.push_str(self.system_prompt.trim());
            prompt.push_str("\n\n");
        }

        prompt.push_str(&format!(
            "You are {}, a committed {} advocate in this debate.\n\
             Rules:\n\
             1. Argue the strongest {} position available.\n\
             2. Do not concede ground or drift to the middle.\n\
             3. Answer your opponent's last point directly before making your own.\n\
             4. Make definite statements, not hedged ones.\n",
            self.name, self.stance, self.stance
        ));
        prompt.push_str(&format!("Style: {}\n", self.rhetorical_style.guidance()));

        if !self.core_beliefs.is_empty() {
            prompt.push_str("Your core beliefs:\n");
            for belief in &self.core_beliefs {
                prompt.push_str(&format!("- {}\n", belief));
            }
        }

        prompt
    }

    /// Left-leaning persona from the default line-up
    pub fn progressive() -> Self {
        Self::new(
            "progressive",
            "Progressive Advocate",
            "deepseek-ai/DeepSeek-V3",
            Stance::Left,
        )
        .with_style(RhetoricalStyle::Analytical)
        .with_system_prompt(
            "You approach every topic from a progressive, left-leaning perspective. \
             Frame issues by their impact on vulnerable groups, expose systemic \
             inequality, and argue for public policy that serves the collective good.",
        )
        .with_beliefs([
            "Systemic problems need systemic solutions",
            "Government has a central role in securing social justice",
            "Collective welfare comes before individual privilege",
            "Markets must be regulated for the common good",
            "Social progress means challenging entrenched power",
        ])
        .with_triggers([
            "free market",
            "deregulation",
            "personal responsibility",
            "traditional values",
            "tax cuts",
        ])
        .with_expertise([
            "social policy",
            "environmental science",
            "public health",
            "labor rights",
            "civil rights",
        ])
        .with_counter_arguments(
            "economy",
            [
                "Unregulated growth concentrates gains at the top",
                "Public investment has historically driven broad prosperity",
            ],
        )
        .with_counter_arguments(
            "climate",
            ["Carbon pricing and regulation cut emissions where voluntary action did not"],
        )
        .with_counter_arguments(
            "health",
            ["Single-payer systems cover everyone at lower cost per capita"],
        )
    }

    /// Right-leaning persona from the default line-up
    pub fn conservative() -> Self {
        Self::new(
            "conservative",
            "Conservative Analyst",
            "Qwen/Qwen2.5-32B-Instruct",
            Stance::Right,
        )
        .with_style(RhetoricalStyle::Pragmatic)
        .with_system_prompt(
            "You approach every topic from a conservative, right-leaning perspective. \
             Frame issues in terms of individual rights, personal responsibility and \
             market solutions, and defend institutions that have proven themselves.",
        )
        .with_beliefs([
            "Individual liberty is the foundation of prosperity",
            "Free markets solve problems better than government",
            "Traditional values provide social stability",
            "A strong defense keeps the peace",
            "Limited government preserves freedom",
        ])
        .with_triggers([
            "redistribution",
            "regulation",
            "big government",
            "systemic",
            "wealth tax",
        ])
        .with_expertise([
            "economics",
            "national security",
            "constitutional law",
            "business",
            "foreign policy",
        ])
        .with_counter_arguments(
            "economy",
            [
                "Every major expansion of regulation has raised costs for small firms first",
                "Lower taxes leave capital with the people who create jobs",
            ],
        )
        .with_counter_arguments(
            "climate",
            ["Innovation, not mandates, has delivered the largest emission cuts"],
        )
        .with_counter_arguments(
            "health",
            ["Competition and price transparency lower costs faster than central planning"],
        )
    }
}

/// Errors from building a persona registry
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Registry must contain at least one persona")]
    Empty,
    #[error("Duplicate persona id: {0}")]
    DuplicateId(String),
}

/// Ordered, read-only table of personas
///
/// Serializes as a plain list; deserializing goes through
/// [`PersonaRegistry::new`], so a loaded registry is never empty and never
/// repeats an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PersonaConfig>", into = "Vec<PersonaConfig>")]
pub struct PersonaRegistry {
    personas: Vec<PersonaConfig>,
}

impl PersonaRegistry {
    /// Build a registry; order is preserved and defines speaking order
    pub fn new(personas: Vec<PersonaConfig>) -> Result<Self, RegistryError> {
        if personas.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::new();
        for persona in &personas {
            if !seen.insert(persona.id.as_str()) {
                return Err(RegistryError::DuplicateId(persona.id.clone()));
            }
        }

        tracing::debug!(count = personas.len(), "Persona registry loaded");
        Ok(Self { personas })
    }

    /// Progressive Advocate vs Conservative Analyst
    pub fn builtin() -> Self {
        Self {
            personas: vec![PersonaConfig::progressive(), PersonaConfig::conservative()],
        }
    }

    /// All personas in speaking order
    pub fn list_personas(&self) -> &[PersonaConfig] {
        &self.personas
    }

    pub fn get(&self, id: &str) -> Option<&PersonaConfig> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Persona at a position in speaking order (wraps around)
    pub fn at(&self, index: usize) -> &PersonaConfig {
        &self.personas[index % self.personas.len()]
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl TryFrom<Vec<PersonaConfig>> for PersonaRegistry {
    type Error = RegistryError;

    fn try_from(personas: Vec<PersonaConfig>) -> Result<Self, Self::Error> {
        Self::new(personas)
    }
}

impl From<PersonaRegistry> for Vec<PersonaConfig> {
    fn from(registry: PersonaRegistry) -> Self {
        registry.personas
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let registry = PersonaRegistry::builtin();
        let ids: Vec<&str> = registry.list_personas().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["progressive", "conservative"]);
        assert_eq!(registry.at(3).id, "conservative");
    }

    #[test]
    fn test_registry_validation() {
        assert_eq!(PersonaRegistry::new(vec![]), Err(RegistryError::Empty));

        let dup = PersonaRegistry::new(vec![
            PersonaConfig::progressive(),
            PersonaConfig::progressive(),
        ]);
        assert_eq!(dup, Err(RegistryError::DuplicateId("progressive".to_string())));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::to_value(PersonaRegistry::builtin()).unwrap();
        let back: PersonaRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(back, PersonaRegistry::builtin());

        let empty = serde_json::from_value::<PersonaRegistry>(serde_json::json!([]));
        assert!(empty.unwrap_err().to_string().contains("at least one persona"));

        let twice = serde_json::to_value(vec![
            PersonaConfig::conservative(),
            PersonaConfig::conservative(),
        ])
        .unwrap();
        let dup = serde_json::from_value::<PersonaRegistry>(twice);
        assert!(dup.unwrap_err().to_string().contains("Duplicate persona id"));
    }

    #[test]
    fn test_debate_prompt_mentions_stance_and_beliefs() {
        let persona = PersonaConfig::conservative();
        let prompt = persona.debate_prompt();
        assert!(prompt.contains("committed right advocate"));
        assert!(prompt.contains("Limited government preserves freedom"));
        assert!(prompt.contains(RhetoricalStyle::Pragmatic.guidance()));
    }

    #[test]
    fn test_counter_arguments_match_topic_keywords() {
        let persona = PersonaConfig::progressive();
        let rebuttals = persona.counter_arguments_for("Is the ECONOMY better off with tariffs?");
        assert_eq!(rebuttals.len(), 2);
        assert!(persona.counter_arguments_for("Should we colonize Mars?").is_empty());
    }
}
