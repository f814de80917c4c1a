// Session data model
// Messages, phases, answers and the persisted conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::coaching::ModuleType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// Stage of a guided session. Declaration order is progression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Warmup,
    Questions,
    Draft,
    Review,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Warmup => "warmup",
            Phase::Questions => "questions",
            Phase::Draft => "draft",
            Phase::Review => "review",
        };
        f.write_str(name)
    }
}

/// One transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, phase: Option<Phase>) -> Self {
        Self {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            phase,
        }
    }
}

/// Key under which an answer is captured: `q0`, `q1`, ...
///
/// Ordered numerically, so `q10` sorts after `q9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnswerKey(pub usize);

impl AnswerKey {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid answer key '{0}'")]
pub struct InvalidAnswerKey(String);

impl FromStr for AnswerKey {
    type Err = InvalidAnswerKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('q')
            .and_then(|n| n.parse().ok())
            .map(AnswerKey)
            .ok_or_else(|| InvalidAnswerKey(s.to_string()))
    }
}

impl Serialize for AnswerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnswerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Progress through the question phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    /// Index of the fixed-list question currently awaiting an answer.
    /// Never decreases; never exceeds the module's question count.
    pub question_index: usize,
    pub answers: BTreeMap<AnswerKey, String>,
    pub completed: bool,
}

impl PhaseState {
    /// Answers in capture order.
    pub fn ordered_answers(&self) -> impl Iterator<Item = (&AnswerKey, &String)> {
        self.answers.iter()
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&AnswerKey(index)).map(String::as_str)
    }
}

/// Full session record; persisted as a whole after every state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub module_type: ModuleType,
    pub project_id: String,
    pub messages: Vec<Message>,
    pub current_phase: Phase,
    pub phase_state: PhaseState,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(module_type: ModuleType, project_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("conv_{}", uuid::Uuid::new_v4().simple()),
            module_type,
            project_id: project_id.into(),
            messages: Vec::new(),
            current_phase: Phase::Questions,
            phase_state: PhaseState::default(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_keys_order_numerically() {
        let mut answers = BTreeMap::new();
        for i in [10, 2, 0, 9] {
            answers.insert(AnswerKey(i), format!("a{i}"));
        }
        let keys: Vec<String> = answers.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["q0", "q2", "q9", "q10"]);
    }

    #[test]
    fn test_answers_serialize_as_string_keyed_map() {
        let mut state = PhaseState::default();
        state.answers.insert(AnswerKey(0), "because".to_string());
        state.answers.insert(AnswerKey(1), "family".to_string());

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["answers"]["q0"], "because");
        assert_eq!(json["answers"]["q1"], "family");

        let back: PhaseState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn test_answer_key_rejects_garbage() {
        assert!("x1".parse::<AnswerKey>().is_err());
        assert!("q".parse::<AnswerKey>().is_err());
        assert_eq!("q12".parse::<AnswerKey>(), Ok(AnswerKey(12)));
    }

    #[test]
    fn test_phase_order_is_progression_order() {
        assert!(Phase::Warmup < Phase::Questions);
        assert!(Phase::Questions < Phase::Draft);
        assert!(Phase::Draft < Phase::Review);
    }
}
