use crate::item::ItemKind;
use serde::{Deserialize, Serialize};

/// TOML layout of a quest content file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QuestFileConfig {
    #[serde(default)]
    pub quests: Vec<QuestConfig>,
}

/// A single `[[quests]]` entry
#[derive(Debug, Deserialize, Serialize)]
pub struct QuestConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reward_xp: u32,
    #[serde(default)]
    pub reward_gold: u32,
    #[serde(default = "default_required_level")]
    pub required_level: u32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

fn default_required_level() -> u32 {
    1
}

/// TOML layout of an item content file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ItemFileConfig {
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

/// A single `[[items]]` entry
#[derive(Debug, Deserialize, Serialize)]
pub struct ItemConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Stat effect in `stat:magnitude` form, e.g. `strength:5`
    pub effect: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub description: String,
}
