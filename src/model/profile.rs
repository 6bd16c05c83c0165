use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::market::Symbol;
use super::topic::{Badge, BadgeId, Topic};

/// Simulated actions recorded in the activity history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SimulationAction {
    Supply,
    Borrow,
}

/// One entry of the append-only simulation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRecord {
    pub action: SimulationAction,
    pub symbol: Symbol,
    pub amount: f64,
    /// Receipt tokens minted (supply only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_amount: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Learner state persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    pub level: u32,
    /// Experience toward the next level; resets on level-up.
    pub experience: u32,
    #[serde(default)]
    pub completed_topics: BTreeSet<Topic>,
    /// Earned badges in award order, unique by id.
    #[serde(default)]
    pub badges: Vec<Badge>,
    #[serde(default)]
    pub simulation_history: Vec<SimulationRecord>,
    /// Display wallet, independent of the position ledger.
    #[serde(default)]
    pub balance: BTreeMap<Symbol, f64>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            username: String::new(),
            level: 1,
            experience: 0,
            completed_topics: BTreeSet::new(),
            badges: Vec::new(),
            simulation_history: Vec::new(),
            balance: BTreeMap::from([
                ("DAI".to_string(), 0.005),
                ("ETH".to_string(), 0.001),
                ("USDC".to_string(), 10.0),
            ]),
        }
    }
}

impl UserProfile {
    pub fn has_badge(&self, id: &BadgeId) -> bool {
        self.badges.iter().any(|b| &b.id == id)
    }

    pub fn has_completed(&self, topic: Topic) -> bool {
        self.completed_topics.contains(&topic)
    }

    /// Experience needed to leave the current level.
    pub fn level_threshold(&self) -> u32 {
        self.level.saturating_mul(crate::engine::progression::XP_PER_LEVEL)
    }
}
