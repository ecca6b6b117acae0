//! Combat - turn-based battles between a character and a single enemy
//!
//! Basic attack damage, for either side:
//!
//! ```text
//! damage = max(1, attacker.strength - defender.strength / 4)
//! ```
//!
//! Damage never takes health below zero.

mod ability;
mod battle;

pub use ability::{use_special_ability, AbilityOutcome, SpecialAbility};
pub use battle::{
    Battle, BattleOutcome, BattleResult, BattleState, CombatEvent, PlayerAction, RoundReport,
};

use crate::character::Character;
use crate::error::GameError;
use crate::rules::{DEFENDER_STRENGTH_DIVISOR, MINIMUM_DAMAGE};
use content_core::EnemyKind;

/// Anything that can attack and be attacked
pub trait Combatant {
    fn name(&self) -> &str;
    fn health(&self) -> u32;
    fn max_health(&self) -> u32;
    fn strength(&self) -> u32;
    fn magic(&self) -> u32;
    fn set_health(&mut self, health: u32);

    fn is_defeated(&self) -> bool {
        self.health() == 0
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }
    fn health(&self) -> u32 {
        self.health
    }
    fn max_health(&self) -> u32 {
        self.max_health
    }
    fn strength(&self) -> u32 {
        self.strength
    }
    fn magic(&self) -> u32 {
        self.magic
    }
    fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }
}

/// An enemy for one encounter; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub defense: u32,
    pub xp_reward: u32,
    pub gold_reward: u32,
}

impl Enemy {
    /// A fresh enemy at full health from its template
    pub fn new(kind: EnemyKind) -> Self {
        let template = kind.template();
        Enemy {
            kind,
            name: template.name.to_string(),
            health: template.health,
            max_health: template.health,
            strength: template.strength,
            magic: template.magic,
            defense: template.defense,
            xp_reward: template.xp_reward,
            gold_reward: template.gold_reward,
        }
    }

    /// Create an enemy from a type name such as `"orc"`
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        let kind: EnemyKind = name
            .parse()
            .map_err(|e: content_core::UnknownEnemy| GameError::InvalidTarget(e.0))?;
        Ok(Enemy::new(kind))
    }

    /// The enemy tier matched to a character level
    pub fn for_level(level: u32) -> Self {
        Enemy::new(EnemyKind::for_level(level))
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }
    fn health(&self) -> u32 {
        self.health
    }
    fn max_health(&self) -> u32 {
        self.max_health
    }
    fn strength(&self) -> u32 {
        self.strength
    }
    fn magic(&self) -> u32 {
        self.magic
    }
    fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }
}

/// Basic attack damage, always at least 1
pub fn calculate_damage(attacker: &impl Combatant, defender: &impl Combatant) -> u32 {
    attacker
        .strength()
        .saturating_sub(defender.strength() / DEFENDER_STRENGTH_DIVISOR)
        .max(MINIMUM_DAMAGE)
}

/// Subtract damage from a target's health, stopping at zero
///
/// Returns the health actually removed.
pub fn apply_damage(target: &mut impl Combatant, damage: u32) -> u32 {
    let before = target.health();
    target.set_health(before.saturating_sub(damage));
    before - target.health()
}

/// Whether a character is in a state to start a fight
pub fn can_fight(character: &Character) -> bool {
    character.is_alive()
}
