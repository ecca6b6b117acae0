//! Class special abilities
//!
//! Every class has exactly one ability and they all share the `"special"`
//! cooldown slot.

use super::{apply_damage, Combatant, Enemy};
use crate::character::{Character, CharacterClass};
use crate::error::GameError;
use crate::progression::heal_character;
use crate::rules::{
    CLERIC_HEAL_AMOUNT, CRITICAL_STRIKE_CHANCE, CRITICAL_STRIKE_MULTIPLIER, FIREBALL_MULTIPLIER,
    POWER_STRIKE_MULTIPLIER, SPECIAL_COOLDOWN_KEY, SPECIAL_COOLDOWN_ROUNDS,
};
use rand::Rng;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialAbility {
    /// Warrior: strength x2 damage
    PowerStrike,
    /// Mage: magic x2 damage
    Fireball,
    /// Rogue: 50% chance of strength x3 damage
    CriticalStrike,
    /// Cleric: heal self for 30
    Heal,
}

impl SpecialAbility {
    pub fn for_class(class: CharacterClass) -> Self {
        match class {
            CharacterClass::Warrior => SpecialAbility::PowerStrike,
            CharacterClass::Mage => SpecialAbility::Fireball,
            CharacterClass::Rogue => SpecialAbility::CriticalStrike,
            CharacterClass::Cleric => SpecialAbility::Heal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpecialAbility::PowerStrike => "Power Strike",
            SpecialAbility::Fireball => "Fireball",
            SpecialAbility::CriticalStrike => "Critical Strike",
            SpecialAbility::Heal => "Heal",
        }
    }
}

impl fmt::Display for SpecialAbility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an ability did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityOutcome {
    /// Damage dealt to the enemy (after clamping at zero health)
    Damage(u32),
    /// The ability fired but did nothing (a missed Critical Strike)
    Missed,
    /// Health restored to the user
    Healed(u32),
}

/// Use the character's class ability against an enemy
///
/// Fails with `AbilityOnCooldown` while the special cooldown is running; the
/// character and enemy are untouched in that case. A successful use, hit or
/// miss, puts the ability on cooldown.
pub fn use_special_ability(
    character: &mut Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> Result<(SpecialAbility, AbilityOutcome), GameError> {
    let ability = SpecialAbility::for_class(character.class);
    let remaining = character.cooldown(SPECIAL_COOLDOWN_KEY);
    if remaining > 0 {
        return Err(GameError::AbilityOnCooldown {
            ability: ability.name().to_string(),
            remaining,
        });
    }

    let outcome = match ability {
        SpecialAbility::PowerStrike => {
            let damage = character.strength().saturating_mul(POWER_STRIKE_MULTIPLIER);
            AbilityOutcome::Damage(apply_damage(enemy, damage))
        }
        SpecialAbility::Fireball => {
            let damage = character.magic().saturating_mul(FIREBALL_MULTIPLIER);
            AbilityOutcome::Damage(apply_damage(enemy, damage))
        }
        SpecialAbility::CriticalStrike => {
            if rng.gen_bool(CRITICAL_STRIKE_CHANCE) {
                let damage = character.strength().saturating_mul(CRITICAL_STRIKE_MULTIPLIER);
                AbilityOutcome::Damage(apply_damage(enemy, damage))
            } else {
                AbilityOutcome::Missed
            }
        }
        SpecialAbility::Heal => {
            AbilityOutcome::Healed(heal_character(character, i64::from(CLERIC_HEAL_AMOUNT)))
        }
    };

    character.set_cooldown(SPECIAL_COOLDOWN_KEY, SPECIAL_COOLDOWN_ROUNDS);
    Ok((ability, outcome))
}
