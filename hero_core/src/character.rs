//! Character model - the player character and its invariants

use crate::error::GameError;
use crate::rules::INVENTORY_CAPACITY;
use content_core::{ItemKind, Stat, StatEffect};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Playable classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Starting stats for a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
}

impl CharacterClass {
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    pub fn base_stats(&self) -> BaseStats {
        match self {
            CharacterClass::Warrior => BaseStats {
                max_health: 120,
                strength: 15,
                magic: 5,
            },
            CharacterClass::Mage => BaseStats {
                max_health: 80,
                strength: 8,
                magic: 20,
            },
            CharacterClass::Rogue => BaseStats {
                max_health: 90,
                strength: 12,
                magic: 10,
            },
            CharacterClass::Cleric => BaseStats {
                max_health: 100,
                strength: 10,
                magic: 15,
            },
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterClass::Warrior => write!(f, "Warrior"),
            CharacterClass::Mage => write!(f, "Mage"),
            CharacterClass::Rogue => write!(f, "Rogue"),
            CharacterClass::Cleric => write!(f, "Cleric"),
        }
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warrior" => Ok(CharacterClass::Warrior),
            "mage" => Ok(CharacterClass::Mage),
            "rogue" => Ok(CharacterClass::Rogue),
            "cleric" => Ok(CharacterClass::Cleric),
            _ => Err(GameError::InvalidCharacterClass(s.trim().to_string())),
        }
    }
}

/// Equipment slot a weapon or armor piece occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    pub fn all() -> &'static [EquipmentSlot] {
        &[EquipmentSlot::Weapon, EquipmentSlot::Armor]
    }

    /// The slot an item kind goes into (consumables have none)
    pub fn for_kind(kind: ItemKind) -> Option<Self> {
        match kind {
            ItemKind::Weapon => Some(EquipmentSlot::Weapon),
            ItemKind::Armor => Some(EquipmentSlot::Armor),
            ItemKind::Consumable => None,
        }
    }

    pub fn item_kind(&self) -> ItemKind {
        match self {
            EquipmentSlot::Weapon => ItemKind::Weapon,
            EquipmentSlot::Armor => ItemKind::Armor,
        }
    }
}

impl fmt::Display for EquipmentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentSlot::Weapon => write!(f, "weapon"),
            EquipmentSlot::Armor => write!(f, "armor"),
        }
    }
}

/// An item in an equipment slot
///
/// The effect is recorded as it was applied, so unequipping reverses exactly
/// that change even if the item's catalog entry is edited later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquippedItem {
    pub item_id: String,
    pub effect: StatEffect,
    /// Health cut off when the effect lowered max_health below current health
    #[serde(default)]
    pub health_withheld: u32,
}

/// A player character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub experience: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub gold: u32,
    /// Carried item ids, in pickup order (duplicates allowed)
    pub inventory: Vec<String>,
    pub active_quests: Vec<String>,
    pub completed_quests: Vec<String>,
    #[serde(default)]
    pub equipped_weapon: Option<EquippedItem>,
    #[serde(default)]
    pub equipped_armor: Option<EquippedItem>,
    /// Ability cooldown key -> rounds remaining
    #[serde(default)]
    pub cooldowns: BTreeMap<String, u32>,
}

impl Character {
    /// Create a level 1 character with the class's base stats
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Result<Self, GameError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(GameError::invalid_data("character name must not be empty"));
        }

        let base = class.base_stats();
        Ok(Character {
            name,
            class,
            level: 1,
            experience: 0,
            health: base.max_health,
            max_health: base.max_health,
            strength: base.strength,
            magic: base.magic,
            gold: 0,
            inventory: Vec::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
            cooldowns: BTreeMap::new(),
        })
    }

    /// Check the invariants a loaded or hand-built character must satisfy
    pub fn validate(&self) -> Result<(), GameError> {
        if self.name.trim().is_empty() {
            return Err(GameError::invalid_data("character name must not be empty"));
        }
        if self.level == 0 {
            return Err(GameError::invalid_data("level must be at least 1"));
        }
        if self.max_health == 0 {
            return Err(GameError::invalid_data("max_health must be positive"));
        }
        if self.health > self.max_health {
            return Err(GameError::invalid_data(format!(
                "health {} exceeds max_health {}",
                self.health, self.max_health
            )));
        }
        if self.inventory.len() > INVENTORY_CAPACITY {
            return Err(GameError::invalid_data(format!(
                "inventory holds {} items, capacity is {}",
                self.inventory.len(),
                INVENTORY_CAPACITY
            )));
        }

        let mut active = HashSet::new();
        for id in &self.active_quests {
            if !active.insert(id.as_str()) {
                return Err(GameError::invalid_data(format!("quest '{}' is active twice", id)));
            }
        }
        let mut completed = HashSet::new();
        for id in &self.completed_quests {
            if !completed.insert(id.as_str()) {
                return Err(GameError::invalid_data(format!(
                    "quest '{}' is completed twice",
                    id
                )));
            }
            if active.contains(id.as_str()) {
                return Err(GameError::invalid_data(format!(
                    "quest '{}' is both active and completed",
                    id
                )));
            }
        }
        Ok(())
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Experience needed to reach the next level from the current one
    pub fn xp_to_next_level(&self) -> u32 {
        self.level
            .saturating_mul(crate::rules::XP_PER_LEVEL)
            .saturating_sub(self.experience)
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => self.equipped_weapon.as_ref(),
            EquipmentSlot::Armor => self.equipped_armor.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<EquippedItem> {
        match slot {
            EquipmentSlot::Weapon => &mut self.equipped_weapon,
            EquipmentSlot::Armor => &mut self.equipped_armor,
        }
    }

    /// Remaining rounds on a cooldown (0 when ready)
    pub fn cooldown(&self, key: &str) -> u32 {
        self.cooldowns.get(key).copied().unwrap_or(0)
    }

    pub(crate) fn set_cooldown(&mut self, key: &str, rounds: u32) {
        self.cooldowns.insert(key.to_string(), rounds);
    }

    /// Count every cooldown down by one round, never below zero
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
    }

    /// Apply a signed change to one stat
    ///
    /// Health is healed or damaged within `0..=max_health`. Lowering
    /// max_health pulls health down with it. Fails without changing anything
    /// if the stat would drop below zero (or max_health to zero).
    pub fn adjust_stat(&mut self, effect: StatEffect) -> Result<(), GameError> {
        let delta = effect.magnitude;
        match effect.stat {
            Stat::Health => {
                if delta >= 0 {
                    self.health = self
                        .health
                        .saturating_add(delta.unsigned_abs())
                        .min(self.max_health);
                } else {
                    self.health = self.health.saturating_sub(delta.unsigned_abs());
                }
            }
            Stat::MaxHealth => {
                let max_health = self
                    .max_health
                    .checked_add_signed(delta)
                    .filter(|&v| v > 0)
                    .ok_or_else(|| out_of_range(effect))?;
                self.max_health = max_health;
                self.health = self.health.min(max_health);
            }
            Stat::Strength => {
                self.strength = self
                    .strength
                    .checked_add_signed(delta)
                    .ok_or_else(|| out_of_range(effect))?;
            }
            Stat::Magic => {
                self.magic = self
                    .magic
                    .checked_add_signed(delta)
                    .ok_or_else(|| out_of_range(effect))?;
            }
        }
        Ok(())
    }
}

fn out_of_range(effect: StatEffect) -> GameError {
    GameError::invalid_data(format!("applying {} would put {} out of range", effect, effect.stat))
}
