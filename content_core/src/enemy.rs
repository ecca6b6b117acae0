//! Enemy templates
//!
//! Enemies are not loaded from content files: there are exactly three
//! templates and a fixed level-to-tier policy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Requested enemy type does not exist
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown enemy type: {0}")]
pub struct UnknownEnemy(pub String);

/// The enemy tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

/// Base stats for an enemy tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    pub name: &'static str,
    pub health: u32,
    pub strength: u32,
    pub magic: u32,
    pub defense: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

const GOBLIN: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Goblin,
    name: "Goblin",
    health: 50,
    strength: 8,
    magic: 2,
    defense: 2,
    xp_reward: 25,
    gold_reward: 10,
};

const ORC: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Orc,
    name: "Orc",
    health: 80,
    strength: 12,
    magic: 5,
    defense: 4,
    xp_reward: 50,
    gold_reward: 25,
};

const DRAGON: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Dragon,
    name: "Dragon",
    health: 200,
    strength: 25,
    magic: 15,
    defense: 10,
    xp_reward: 200,
    gold_reward: 100,
};

impl EnemyKind {
    pub fn all() -> &'static [EnemyKind] {
        &[EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon]
    }

    /// Tier for a character level: 1-2 goblin, 3-5 orc, 6+ dragon
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=2 => EnemyKind::Goblin,
            3..=5 => EnemyKind::Orc,
            _ => EnemyKind::Dragon,
        }
    }

    pub fn template(&self) -> &'static EnemyTemplate {
        match self {
            EnemyKind::Goblin => &GOBLIN,
            EnemyKind::Orc => &ORC,
            EnemyKind::Dragon => &DRAGON,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template().name)
    }
}

impl FromStr for EnemyKind {
    type Err = UnknownEnemy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goblin" => Ok(EnemyKind::Goblin),
            "orc" => Ok(EnemyKind::Orc),
            "dragon" => Ok(EnemyKind::Dragon),
            _ => Err(UnknownEnemy(s.to_string())),
        }
    }
}
