//! Debate phase state machine
//!
//! Phases only move forward. Each phase is left once the transcript holds
//! enough assistant messages; at most one step is taken per check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse phase of a debate, ordered from first to last
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DebatePhase {
    #[default]
    Opening,
    Exploration,
    Confrontation,
    Resolution,
    /// Terminal
    Reflection,
}

impl DebatePhase {
    /// All phases in order
    pub const ALL: [DebatePhase; 5] = [
        Self::Opening,
        Self::Exploration,
        Self::Confrontation,
        Self::Resolution,
        Self::Reflection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Opening => "opening",
            Self::Exploration => "exploration",
            Self::Confrontation => "confrontation",
            Self::Resolution => "resolution",
            Self::Reflection => "reflection",
        }
    }

    /// The phase that follows this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Opening => Some(Self::Exploration),
            Self::Exploration => Some(Self::Confrontation),
            Self::Confrontation => Some(Self::Resolution),
            Self::Resolution => Some(Self::Reflection),
            Self::Reflection => None,
        }
    }

    /// Assistant-message count at which this phase is left
    pub fn exit_threshold(&self) -> Option<usize> {
        match self {
            Self::Opening => Some(3),
            Self::Exploration => Some(5),
            Self::Confrontation => Some(8),
            Self::Resolution => Some(10),
            Self::Reflection => None,
        }
    }

    /// Single-step transition check
    ///
    /// Returns the next phase when `assistant_messages` has reached this
    /// phase's exit threshold. Never skips a phase, even if the count would
    /// satisfy several thresholds at once.
    pub fn transition(&self, assistant_messages: usize) -> Option<Self> {
        match self.exit_threshold() {
            Some(threshold) if assistant_messages >= threshold => self.next(),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Title-cased name for display
    pub fn title(&self) -> &'static str {
        match self {
            Self::Opening => "Opening",
            Self::Exploration => "Exploration",
            Self::Confrontation => "Confrontation",
            Self::Resolution => "Resolution",
            Self::Reflection => "Reflection",
        }
    }
}

impl fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebatePhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown debate phase '{}'", s))
    }
}
