//! Progression - experience, leveling, healing, gold and revival
//!
//! Leveling formula: a level `n` character levels up once experience reaches
//! `n * 100`. The threshold amount is consumed, so leftover experience
//! carries into the next level. Each level gained grants +10 max health,
//! +2 strength, +2 magic and a full heal.

use crate::character::Character;
use crate::error::GameError;
use crate::rules::{LEVEL_UP_MAGIC, LEVEL_UP_MAX_HEALTH, LEVEL_UP_STRENGTH, XP_PER_LEVEL};

/// What a call to [`gain_experience`] did to the character's level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelUp {
    pub previous_level: u32,
    pub new_level: u32,
}

impl LevelUp {
    pub fn leveled_up(&self) -> bool {
        self.new_level > self.previous_level
    }

    pub fn levels_gained(&self) -> u32 {
        self.new_level - self.previous_level
    }
}

/// Add experience and resolve every level-up it pays for
///
/// Fails with `CharacterDead` for a dead character.
pub fn gain_experience(character: &mut Character, xp: u32) -> Result<LevelUp, GameError> {
    if !character.is_alive() {
        return Err(GameError::CharacterDead(character.name.clone()));
    }

    let previous_level = character.level;
    let mut next = character.clone();
    next.experience = next
        .experience
        .checked_add(xp)
        .ok_or_else(|| GameError::InvalidData(format!("experience overflow adding {}", xp)))?;

    loop {
        let threshold = next.level.saturating_mul(XP_PER_LEVEL);
        if next.experience < threshold {
            break;
        }
        next.experience -= threshold;
        next.level += 1;
        next.max_health = next.max_health.saturating_add(LEVEL_UP_MAX_HEALTH);
        next.strength = next.strength.saturating_add(LEVEL_UP_STRENGTH);
        next.magic = next.magic.saturating_add(LEVEL_UP_MAGIC);
        next.health = next.max_health;
    }

    let report = LevelUp {
        previous_level,
        new_level: next.level,
    };
    *character = next;
    Ok(report)
}

/// Restore up to `amount` health, returning how much was actually healed
pub fn heal_character(character: &mut Character, amount: i64) -> u32 {
    if amount <= 0 {
        return 0;
    }
    let missing = character.max_health.saturating_sub(character.health);
    let healed = u32::try_from(amount).unwrap_or(u32::MAX).min(missing);
    character.health += healed;
    healed
}

/// Add (or with a negative amount, spend) gold
///
/// Returns the new total. Fails with `InsufficientFunds` if the total would
/// go negative; the character is not touched in that case.
pub fn add_gold(character: &mut Character, amount: i64) -> Result<u32, GameError> {
    let total = i64::from(character.gold)
        .checked_add(amount)
        .ok_or_else(|| GameError::InvalidData(format!("gold overflow adding {}", amount)))?;
    if total < 0 {
        return Err(GameError::InsufficientFunds {
            required: amount.unsigned_abs(),
            available: u64::from(character.gold),
        });
    }
    let total = u32::try_from(total)
        .map_err(|_| GameError::InvalidData(format!("gold total {} is too large", total)))?;
    character.gold = total;
    Ok(total)
}

pub fn is_dead(character: &Character) -> bool {
    character.health == 0
}

/// Bring a dead character back at half health (at least 1)
///
/// Returns false and does nothing if the character is alive.
pub fn revive(character: &mut Character) -> bool {
    if character.is_alive() {
        return false;
    }
    character.health = (character.max_health / 2).max(1);
    true
}
