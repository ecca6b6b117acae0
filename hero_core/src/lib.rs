//! hero_core - Character rules engine for Quest Chronicles
//!
//! This library provides:
//! - Character: the player character model and its invariants
//! - Progression: experience, leveling, healing, gold and revival
//! - Inventory: carrying, using, equipping, buying and selling items
//! - Quests: accept/complete/abandon with level and prerequisite gates
//! - Combat: turn-based battles with class abilities, cooldowns and escape
//! - GameSession: the character and catalog bundled for a driver
//!
//! Every rule operation returns `Result<_, GameError>` and leaves the
//! character untouched when it fails. Nothing in this crate prints or logs.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hero_core::prelude::*;
//!
//! let hero = Character::new("Aria", CharacterClass::Mage)?;
//! let mut session = GameSession::new(hero, Catalog::builtin());
//!
//! let mut battle = session.explore()?;
//! let mut rng = rand::thread_rng();
//! let result = battle.resolve(session.character_mut(), &mut rng, |_, _| PlayerAction::Attack)?;
//! let level_up = session.apply_battle_result(&result)?;
//! println!("{:?}: now level {}", result.outcome, level_up.new_level);
//! ```

pub mod character;
pub mod combat;
pub mod error;
pub mod inventory;
pub mod prelude;
pub mod progression;
pub mod quest;
pub mod rules;
pub mod session;

// Core API - what most users need
pub use character::{Character, CharacterClass, EquipmentSlot, EquippedItem};
pub use error::GameError;
pub use session::GameSession;

// Combat
pub use combat::{Battle, BattleOutcome, BattleResult, Enemy, PlayerAction};
