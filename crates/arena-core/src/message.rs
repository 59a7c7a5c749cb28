//! Messages and the debate transcript
//!
//! A [`Message`] is the unit of the debate record. Messages are immutable once
//! appended to a [`Transcript`], which only ever grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Who authored a message, in chat-completion terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Persona instructions seeded before the first turn
    System,
    /// The human-provided topic or follow-up
    User,
    /// A persona's generated turn
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Political stance a persona argues from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Left,
    Right,
    Neutral,
}

impl Stance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Neutral => "neutral",
        }
    }

    /// Whether this stance takes a side (left or right)
    pub fn is_partisan(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown stance '{}'", other)),
        }
    }
}

/// A single entry in the debate transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Chat role
    pub role: Role,
    /// Message text
    pub content: String,
    /// Model identifier of the speaker (empty for user messages)
    pub speaker_model: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// Stance of the speaker, if any
    pub stance: Option<Stance>,
    /// Free-form annotations (persona id, phase, scores, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(role: Role, content: impl Into<String>, speaker_model: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            speaker_model: speaker_model.into(),
            timestamp: Utc::now(),
            stance: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Persona instruction message
    pub fn system(content: impl Into<String>, model: impl Into<String>, stance: Stance) -> Self {
        Self::new(Role::System, content, model).with_stance(stance)
    }

    /// Human topic / follow-up message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, "")
    }

    /// Generated persona turn
    pub fn assistant(content: impl Into<String>, model: impl Into<String>, stance: Stance) -> Self {
        Self::new(Role::Assistant, content, model).with_stance(stance)
    }

    pub fn with_stance(mut self, stance: Stance) -> Self {
        self.stance = Some(stance);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// Look up a metadata value
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Look up a metadata value and parse it as a float
    pub fn meta_f64(&self, key: &str) -> Option<f64> {
        self.meta(key).and_then(|v| v.parse().ok())
    }
}

/// Append-only, ordered record of a debate
///
/// Transcript order is the only source of truth for turn history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Existing entries are never modified.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages with the given role
    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    /// Number of generated turns
    pub fn assistant_count(&self) -> usize {
        self.count_role(Role::Assistant)
    }

    /// Messages shown to a reader (everything except seeded system prompts)
    pub fn visible_count(&self) -> usize {
        self.messages.len() - self.count_role(Role::System)
    }

    /// Assistant messages spoken by the given persona, in order
    pub fn spoken_by<'a>(&'a self, persona_id: &'a str) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages
            .iter()
            .filter(move |m| m.role == Role::Assistant && m.meta("persona_id") == Some(persona_id))
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_round_trip() {
        let message = Message::assistant("Markets allocate better.", "Qwen/Qwen2.5-32B-Instruct", Stance::Right)
            .with_metadata("persona_id", "conservative")
            .with_metadata("argument_strength", 0.62);

        let json = serde_json::to_string(&message).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();

        assert_eq!(back, message);
        assert_eq!(back.meta_f64("argument_strength"), Some(0.62));
    }

    #[test]
    fn test_role_and_stance_wire_names() {
        let json = serde_json::to_string(&Message::user("topic")).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"stance\":null"));
        assert_eq!("Left".parse::<Stance>(), Ok(Stance::Left));
        assert!("centrist".parse::<Stance>().is_err());
    }

    #[test]
    fn test_transcript_counts() {
        let mut transcript = Transcript::new();
        transcript.push(Message::system("be left", "m1", Stance::Left));
        transcript.push(Message::system("be right", "m2", Stance::Right));
        transcript.push(Message::user("Should cities ban cars?"));
        transcript.push(
            Message::assistant("Yes.", "m1", Stance::Left).with_metadata("persona_id", "progressive"),
        );

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.assistant_count(), 1);
        assert_eq!(transcript.visible_count(), 2);
        assert_eq!(transcript.count_role(Role::User), 1);
        assert_eq!(transcript.spoken_by("progressive").count(), 1);
        assert_eq!(transcript.spoken_by("conservative").count(), 0);
    }
}
