//! Battle state machine
//!
//! A round is one player turn followed, if the battle is still active, by
//! one enemy turn. The end condition is checked after every action, so a
//! killing blow from the player pre-empts the enemy's retaliation.

use super::ability::{use_special_ability, AbilityOutcome, SpecialAbility};
use super::{apply_damage, calculate_damage, Combatant, Enemy};
use crate::character::Character;
use crate::error::GameError;
use crate::rules::ESCAPE_CHANCE;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    Special,
    Flee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    PlayerWon,
    EnemyWon,
    Escaped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Active,
    Ended(BattleOutcome),
}

/// Something that happened during a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatEvent {
    PlayerAttack {
        damage: u32,
    },
    EnemyAttack {
        damage: u32,
    },
    Special {
        ability: SpecialAbility,
        outcome: AbilityOutcome,
    },
    EscapeFailed,
    Escaped,
}

/// Everything that happened in one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    pub round: u32,
    pub events: Vec<CombatEvent>,
    /// Set when the battle ended during this round
    pub outcome: Option<BattleOutcome>,
}

/// Terminal result of an encounter
///
/// The battle never applies these rewards itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleResult {
    pub outcome: BattleOutcome,
    pub xp_gained: u32,
    pub gold_gained: u32,
}

/// One encounter between a character and a single enemy
#[derive(Debug, Clone)]
pub struct Battle {
    enemy: Enemy,
    state: BattleState,
    round: u32,
}

impl Battle {
    /// Start an encounter; a dead character cannot fight
    pub fn start(character: &Character, enemy: Enemy) -> Result<Self, GameError> {
        if !character.is_alive() {
            return Err(GameError::CharacterDead(character.name.clone()));
        }
        Ok(Battle {
            enemy,
            state: BattleState::Active,
            round: 0,
        })
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BattleState::Active
    }

    /// Number of completed rounds
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player_turn(
        &mut self,
        character: &mut Character,
        action: PlayerAction,
        rng: &mut impl Rng,
    ) -> Result<CombatEvent, GameError> {
        self.ensure_active()?;

        let event = match action {
            PlayerAction::Attack => {
                let damage = calculate_damage(&*character, &self.enemy);
                CombatEvent::PlayerAttack {
                    damage: apply_damage(&mut self.enemy, damage),
                }
            }
            PlayerAction::Special => {
                let (ability, outcome) = use_special_ability(character, &mut self.enemy, rng)?;
                CombatEvent::Special { ability, outcome }
            }
            PlayerAction::Flee => {
                if rng.gen_bool(ESCAPE_CHANCE) {
                    self.state = BattleState::Ended(BattleOutcome::Escaped);
                    return Ok(CombatEvent::Escaped);
                }
                CombatEvent::EscapeFailed
            }
        };

        self.check_end(character);
        Ok(event)
    }

    /// The enemy's fixed basic attack
    pub fn enemy_turn(&mut self, character: &mut Character) -> Result<CombatEvent, GameError> {
        self.ensure_active()?;

        let damage = calculate_damage(&self.enemy, &*character);
        let dealt = apply_damage(character, damage);
        self.check_end(character);
        Ok(CombatEvent::EnemyAttack { damage: dealt })
    }

    /// Play a full round and tick the character's cooldowns
    ///
    /// A rejected player action (such as a special on cooldown) fails the
    /// whole round without changing anything.
    pub fn play_round(
        &mut self,
        character: &mut Character,
        action: PlayerAction,
        rng: &mut impl Rng,
    ) -> Result<RoundReport, GameError> {
        let mut events = vec![self.player_turn(character, action, rng)?];
        if self.is_active() {
            events.push(self.enemy_turn(character)?);
        }
        character.tick_cooldowns();
        self.round += 1;

        Ok(RoundReport {
            round: self.round,
            events,
            outcome: self.outcome(),
        })
    }

    /// Fight until the battle ends, asking `choose` for each player action
    ///
    /// A special chosen while on cooldown falls back to a basic attack.
    pub fn resolve<R, F>(
        &mut self,
        character: &mut Character,
        rng: &mut R,
        mut choose: F,
    ) -> Result<BattleResult, GameError>
    where
        R: Rng,
        F: FnMut(&Character, &Battle) -> PlayerAction,
    {
        self.ensure_active()?;

        while self.is_active() {
            let action = choose(&*character, &*self);
            match self.play_round(character, action, rng) {
                Ok(_) => {}
                Err(GameError::AbilityOnCooldown { .. }) => {
                    self.play_round(character, PlayerAction::Attack, rng)?;
                }
                Err(e) => return Err(e),
            }
        }

        self.result().ok_or(GameError::CombatNotActive)
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.state {
            BattleState::Active => None,
            BattleState::Ended(outcome) => Some(outcome),
        }
    }

    /// The terminal result, or `None` while the battle is still running
    pub fn result(&self) -> Option<BattleResult> {
        let outcome = self.outcome()?;
        let (xp_gained, gold_gained) = match outcome {
            BattleOutcome::PlayerWon => (self.enemy.xp_reward, self.enemy.gold_reward),
            BattleOutcome::EnemyWon | BattleOutcome::Escaped => (0, 0),
        };
        Some(BattleResult {
            outcome,
            xp_gained,
            gold_gained,
        })
    }

    fn ensure_active(&self) -> Result<(), GameError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GameError::CombatNotActive)
        }
    }

    fn check_end(&mut self, character: &Character) {
        if self.enemy.is_defeated() {
            self.state = BattleState::Ended(BattleOutcome::PlayerWon);
        } else if character.is_defeated() {
            self.state = BattleState::Ended(BattleOutcome::EnemyWon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::rules::{SPECIAL_COOLDOWN_KEY, SPECIAL_COOLDOWN_ROUNDS};
    use content_core::EnemyKind;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn heads() -> StepRng {
        StepRng::new(0, 0)
    }

    fn tails() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn hero(class: CharacterClass) -> Character {
        Character::new("Hero", class).unwrap()
    }

    #[test]
    fn test_dead_character_cannot_start() {
        let mut c = hero(CharacterClass::Warrior);
        c.health = 0;
        let result = Battle::start(&c, Enemy::new(EnemyKind::Goblin));
        assert!(matches!(result, Err(GameError::CharacterDead(_))));
    }

    #[test]
    fn test_killing_blow_skips_enemy_turn() {
        let mut c = hero(CharacterClass::Warrior);
        let mut goblin = Enemy::new(EnemyKind::Goblin);
        goblin.health = 1;
        let mut battle = Battle::start(&c, goblin).unwrap();

        let report = battle
            .play_round(&mut c, PlayerAction::Attack, &mut heads())
            .unwrap();
        assert_eq!(report.events, vec![CombatEvent::PlayerAttack { damage: 1 }]);
        assert_eq!(report.outcome, Some(BattleOutcome::PlayerWon));
        assert_eq!(c.health, 120);
        assert_eq!(
            battle.result(),
            Some(BattleResult {
                outcome: BattleOutcome::PlayerWon,
                xp_gained: 25,
                gold_gained: 10
            })
        );
    }

    #[test]
    fn test_round_trades_blows() {
        let mut c = hero(CharacterClass::Warrior);
        let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Orc)).unwrap();

        let report = battle
            .play_round(&mut c, PlayerAction::Attack, &mut heads())
            .unwrap();
        // Warrior 15 vs orc 12: 15 - 3; orc 12 vs warrior 15: 12 - 3
        assert_eq!(
            report.events,
            vec![
                CombatEvent::PlayerAttack { damage: 12 },
                CombatEvent::EnemyAttack { damage: 9 },
            ]
        );
        assert_eq!(report.round, 1);
        assert_eq!(report.outcome, None);
        assert_eq!(battle.enemy().health, 68);
        assert_eq!(c.health, 111);
    }

    #[test]
    fn test_enemy_can_win() {
        let mut c = hero(CharacterClass::Mage);
        c.health = 5;
        let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Dragon)).unwrap();

        let report = battle
            .play_round(&mut c, PlayerAction::Attack, &mut heads())
            .unwrap();
        assert_eq!(report.outcome, Some(BattleOutcome::EnemyWon));
        assert_eq!(c.health, 0);
        assert_eq!(
            battle.result(),
            Some(BattleResult {
                outcome: BattleOutcome::EnemyWon,
                xp_gained: 0,
                gold_gained: 0
            })
        );
    }

    #[test]
    fn test_successful_escape_has_no_rewards() {
        let mut c = hero(CharacterClass::Rogue);
        let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Orc)).unwrap();

        let report = battle
            .play_round(&mut c, PlayerAction::Flee, &mut heads())
            .unwrap();
        assert_eq!(report.events, vec![CombatEvent::Escaped]);
        assert_eq!(battle.state(), BattleState::Ended(BattleOutcome::Escaped));
        let result = battle.result().unwrap();
        assert_eq!(result.xp_gained, 0);
        assert_eq!(result.gold_gained, 0);
    }

    #[test]
    fn test_failed_escapes_change_nothing() {
        let mut c = hero(CharacterClass::Rogue);
        c.inventory.push("health_potion".to_string());
        let before = c.clone();
        let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Goblin)).unwrap();

        for _ in 0..5 {
            let event = battle
                .player_turn(&mut c, PlayerAction::Flee, &mut tails())
                .unwrap();
            assert_eq!(event, CombatEvent::EscapeFailed);
            assert!(battle.is_active());
        }
        assert_eq!(c, before);
        assert_eq!(battle.enemy().health, 50);
    }

    #[test]
    fn test_special_cooldown_spans_rounds() {
        let mut c = hero(CharacterClass::Warrior);
        let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Dragon)).unwrap();
        let mut rng = heads();

        let report = battle
            .play_round(&mut c, PlayerAction::Special, &mut rng)
            .unwrap();
        assert_eq!(
            report.events[0],
            CombatEvent::Special {
                ability: SpecialAbility::PowerStrike,
                outcome: AbilityOutcome::Damage(30)
            }
        );
        assert_eq!(c.cooldown(SPECIAL_COOLDOWN_KEY), SPECIAL_COOLDOWN_ROUNDS - 1);

        let before = c.clone();
        let result = battle.play_round(&mut c, PlayerAction::Special, &mut rng);
        assert!(matches!(result, Err(GameError::AbilityOnCooldown { .. })));
        assert_eq!(c, before);
        assert_eq!(battle.round(), 1);

        battle.play_round(&mut c, PlayerAction::Attack, &mut rng).unwrap();
        battle.play_round(&mut c, PlayerAction::Attack, &mut rng).unwrap();
        assert_eq!(c.cooldown(SPECIAL_COOLDOWN_KEY), 0);
        assert!(battle
            .play_round(&mut c, PlayerAction::Special, &mut rng)
            .is_ok());
    }

    #[test]
    fn test_actions_after_end_fail() {
        let mut c = hero(CharacterClass::Warrior);
        let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Goblin)).unwrap();
        battle
            .play_round(&mut c, PlayerAction::Flee, &mut heads())
            .unwrap();

        assert_eq!(
            battle.player_turn(&mut c, PlayerAction::Attack, &mut heads()),
            Err(GameError::CombatNotActive)
        );
        assert_eq!(battle.enemy_turn(&mut c), Err(GameError::CombatNotActive));
        assert_eq!(
            battle.play_round(&mut c, PlayerAction::Attack, &mut heads()),
            Err(GameError::CombatNotActive)
        );
    }

    #[test]
    fn test_result_is_none_while_active() {
        let c = hero(CharacterClass::Cleric);
        let battle = Battle::start(&c, Enemy::new(EnemyKind::Goblin)).unwrap();
        assert_eq!(battle.result(), None);
        assert!(battle.is_active());
    }

    #[test]
    fn test_resolve_runs_to_completion() {
        let mut c = hero(CharacterClass::Warrior);
        let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Goblin)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let result = battle
            .resolve(&mut c, &mut rng, |_, _| PlayerAction::Special)
            .unwrap();
        assert_eq!(result.outcome, BattleOutcome::PlayerWon);
        assert_eq!(result.xp_gained, 25);
        assert!(c.health > 0 && c.health <= c.max_health);
        assert!(!battle.is_active());
    }

    #[test]
    fn test_resolve_never_breaks_health_bounds() {
        for seed in 0..20 {
            let mut c = hero(CharacterClass::Cleric);
            let mut battle = Battle::start(&c, Enemy::new(EnemyKind::Dragon)).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let result = battle
                .resolve(&mut c, &mut rng, |c, _| {
                    if c.health < 40 {
                        PlayerAction::Special
                    } else {
                        PlayerAction::Attack
                    }
                })
                .unwrap();
            assert!(c.health <= c.max_health);
            assert!(battle.enemy().health <= battle.enemy().max_health);
            assert_eq!(result.outcome == BattleOutcome::EnemyWon, c.health == 0);
        }
    }
}
