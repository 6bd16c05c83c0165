use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("Unknown topic `{0}` (expected one of: ctoken, apy, collateral, liquidation, interest, governance)")]
    UnknownTopic(String),

    #[error("Unknown difficulty `{0}` (expected beginner, intermediate or advanced)")]
    UnknownDifficulty(String),

    #[error("Invalid badge id `{0}`: use 1-64 lowercase letters, digits or underscores")]
    InvalidBadgeId(String),
}

// ── Topics ──────────────────────────────────────────────────────────

/// Lesson topics, in curriculum order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Ctoken,
    Apy,
    Collateral,
    Liquidation,
    Interest,
    Governance,
}

impl Topic {
    pub const ALL: [Topic; 6] = [
        Topic::Ctoken,
        Topic::Apy,
        Topic::Collateral,
        Topic::Liquidation,
        Topic::Interest,
        Topic::Governance,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Topic::Ctoken => "ctoken",
            Topic::Apy => "apy",
            Topic::Collateral => "collateral",
            Topic::Liquidation => "liquidation",
            Topic::Interest => "interest",
            Topic::Governance => "governance",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Topic::Ctoken => "What is a cToken?",
            Topic::Apy => "Understanding APY",
            Topic::Collateral => "Collateral Factor",
            Topic::Liquidation => "Liquidation Risk",
            Topic::Interest => "Interest Rate Models",
            Topic::Governance => "Compound Governance",
        }
    }

    /// The lesson after this one, if any.
    pub fn next(&self) -> Option<Topic> {
        let idx = Topic::ALL.iter().position(|t| t == self)?;
        Topic::ALL.get(idx + 1).copied()
    }

    /// Match a topic by id or title, case-insensitively.
    pub fn lookup(text: &str) -> Option<Topic> {
        let needle = text.trim().to_lowercase();
        Topic::ALL
            .into_iter()
            .find(|t| t.id() == needle || t.title().to_lowercase() == needle)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Topic {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::lookup(s).ok_or_else(|| IdentifierError::UnknownTopic(s.to_string()))
    }
}

// ── Difficulty ──────────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Everyday analogies.
    #[default]
    Beginner,
    /// Some protocol terminology.
    Intermediate,
    /// Technical detail.
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(IdentifierError::UnknownDifficulty(s.to_string())),
        }
    }
}

// ── Badges ──────────────────────────────────────────────────────────

/// Validated badge identifier, e.g. `quiz_ctoken`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct BadgeId(String);

impl BadgeId {
    pub fn new(id: impl Into<String>) -> Result<Self, IdentifierError> {
        let id = id.into();
        let valid = !id.is_empty()
            && id.len() <= 64
            && id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if valid {
            Ok(BadgeId(id))
        } else {
            Err(IdentifierError::InvalidBadgeId(id))
        }
    }

    /// Badge earned by passing a topic's quiz.
    pub fn for_quiz(topic: Topic) -> Self {
        BadgeId(format!("quiz_{}", topic.id()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BadgeId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BadgeId::new(value)
    }
}

impl From<BadgeId> for String {
    fn from(id: BadgeId) -> Self {
        id.0
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    Completion,
    Quiz,
    Simulation,
    Achievement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    pub description: String,
}

impl Badge {
    pub fn for_quiz(topic: Topic) -> Self {
        Badge {
            id: BadgeId::for_quiz(topic),
            name: format!("{} Expert", topic.title()),
            kind: BadgeKind::Quiz,
            description: format!("Successfully completed the quiz on {}", topic.title()),
        }
    }
}
