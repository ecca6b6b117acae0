//! Prelude module for convenient imports
//!
//! ```rust
//! use hero_core::prelude::*;
//! ```

// Character model
pub use crate::character::{Character, CharacterClass, EquipmentSlot, EquippedItem};
pub use crate::error::GameError;

// Session
pub use crate::session::GameSession;

// Combat
pub use crate::combat::{
    Battle, BattleOutcome, BattleResult, CombatEvent, Enemy, PlayerAction, SpecialAbility,
};

// Rule results
pub use crate::inventory::ItemUse;
pub use crate::progression::LevelUp;
pub use crate::quest::{QuestReward, QuestStatus};

// Re-exports from content_core
pub use content_core::{Catalog, Item, ItemKind, Quest};
