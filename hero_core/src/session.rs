//! Game session - the character being played together with the loaded content
//!
//! The driver owns one session at a time and routes every player decision
//! through it. Operations that take an item or quest id resolve it against
//! the catalog before handing off to the rule modules.

use crate::character::{Character, EquipmentSlot};
use crate::combat::{Battle, BattleOutcome, BattleResult, Enemy};
use crate::error::GameError;
use crate::inventory::{self, ItemUse};
use crate::progression::{self, LevelUp};
use crate::quest::{self, QuestReward};
use content_core::{Catalog, Item, ItemKind};

#[derive(Debug, Clone)]
pub struct GameSession {
    character: Character,
    catalog: Catalog,
}

impl GameSession {
    pub fn new(character: Character, catalog: Catalog) -> Self {
        Self { character, catalog }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    /// Start a battle against the enemy tier for the character's level
    pub fn explore(&self) -> Result<Battle, GameError> {
        Battle::start(&self.character, Enemy::for_level(self.character.level))
    }

    /// Start a battle against a named enemy type
    pub fn encounter(&self, enemy_name: &str) -> Result<Battle, GameError> {
        let enemy = Enemy::from_name(enemy_name)?;
        Battle::start(&self.character, enemy)
    }

    /// Pay out a finished battle's rewards
    ///
    /// Only a win pays anything. Gold is added and experience goes through
    /// leveling, both or neither.
    pub fn apply_battle_result(&mut self, result: &BattleResult) -> Result<LevelUp, GameError> {
        let unchanged = LevelUp {
            previous_level: self.character.level,
            new_level: self.character.level,
        };
        if result.outcome != BattleOutcome::PlayerWon {
            return Ok(unchanged);
        }

        let mut next = self.character.clone();
        progression::add_gold(&mut next, i64::from(result.gold_gained))?;
        let level_up = progression::gain_experience(&mut next, result.xp_gained)?;
        self.character = next;
        Ok(level_up)
    }

    pub fn revive(&mut self) -> bool {
        progression::revive(&mut self.character)
    }

    pub fn use_item(&mut self, item_id: &str) -> Result<ItemUse, GameError> {
        let item = self.item(item_id)?;
        inventory::use_item(&mut self.character, &item)
    }

    /// Equip a weapon or armor piece into the slot matching its kind
    pub fn equip(&mut self, item_id: &str) -> Result<Option<String>, GameError> {
        let item = self.item(item_id)?;
        if !inventory::has_item(&self.character, item_id) {
            return Err(GameError::ItemNotFound(item_id.to_string()));
        }
        let slot = EquipmentSlot::for_kind(item.kind).ok_or_else(|| GameError::InvalidItemType {
            item_id: item.id.clone(),
            expected: format!("{} or {}", ItemKind::Weapon, ItemKind::Armor),
            actual: item.kind.to_string(),
        })?;
        inventory::equip(&mut self.character, &item, slot)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> Result<Option<String>, GameError> {
        inventory::unequip(&mut self.character, slot)
    }

    /// Buy an item from the catalog, returning the gold left
    pub fn buy(&mut self, item_id: &str) -> Result<u32, GameError> {
        let item = self.item(item_id)?;
        inventory::purchase(&mut self.character, &item)
    }

    /// Sell a carried item, returning the gold received
    pub fn sell(&mut self, item_id: &str) -> Result<u32, GameError> {
        let item = self.item(item_id)?;
        inventory::sell(&mut self.character, &item)
    }

    pub fn drop_item(&mut self, item_id: &str) -> Result<(), GameError> {
        inventory::drop_item(&mut self.character, item_id)
    }

    pub fn accept_quest(&mut self, quest_id: &str) -> Result<(), GameError> {
        quest::accept_quest(&mut self.character, &self.catalog, quest_id)
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> Result<QuestReward, GameError> {
        quest::complete_quest(&mut self.character, &self.catalog, quest_id)
    }

    pub fn abandon_quest(&mut self, quest_id: &str) -> Result<(), GameError> {
        quest::abandon_quest(&mut self.character, quest_id)
    }

    fn item(&self, item_id: &str) -> Result<Item, GameError> {
        self.catalog
            .item(item_id)
            .cloned()
            .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use crate::combat::PlayerAction;
    use content_core::EnemyKind;
    use rand::rngs::mock::StepRng;

    fn session(class: CharacterClass) -> GameSession {
        let character = Character::new("Aria", class).unwrap();
        GameSession::new(character, Catalog::builtin())
    }

    #[test]
    fn test_explore_matches_level() {
        let mut s = session(CharacterClass::Warrior);
        assert_eq!(s.explore().unwrap().enemy().kind, EnemyKind::Goblin);
        s.character_mut().level = 7;
        assert_eq!(s.explore().unwrap().enemy().kind, EnemyKind::Dragon);
    }

    #[test]
    fn test_encounter_unknown_enemy() {
        let s = session(CharacterClass::Warrior);
        assert_eq!(s.encounter("orc").unwrap().enemy().kind, EnemyKind::Orc);
        assert_eq!(
            s.encounter("slime").unwrap_err(),
            GameError::InvalidTarget("slime".to_string())
        );
    }

    #[test]
    fn test_win_pays_rewards() {
        let mut s = session(CharacterClass::Warrior);
        let mut battle = s.encounter("goblin").unwrap();
        let mut rng = StepRng::new(0, 0);
        let result = battle
            .resolve(s.character_mut(), &mut rng, |_, _| PlayerAction::Attack)
            .unwrap();
        assert_eq!(result.outcome, BattleOutcome::PlayerWon);

        let level_up = s.apply_battle_result(&result).unwrap();
        assert!(!level_up.leveled_up());
        assert_eq!(s.character().experience, 25);
        assert_eq!(s.character().gold, 10);
    }

    #[test]
    fn test_loss_pays_nothing_and_revives() {
        let mut s = session(CharacterClass::Mage);
        s.character_mut().health = 0;
        let result = BattleResult {
            outcome: BattleOutcome::EnemyWon,
            xp_gained: 0,
            gold_gained: 0,
        };
        s.apply_battle_result(&result).unwrap();
        assert_eq!(s.character().experience, 0);

        assert!(s.revive());
        assert_eq!(s.character().health, 40);
    }

    #[test]
    fn test_shop_round_trip() {
        let mut s = session(CharacterClass::Rogue);
        s.character_mut().gold = 120;
        assert_eq!(s.buy("iron_sword").unwrap(), 20);
        assert_eq!(s.sell("iron_sword").unwrap(), 50);
        assert_eq!(s.character().gold, 70);
        assert!(s.character().inventory.is_empty());
    }

    #[test]
    fn test_unknown_item_id() {
        let mut s = session(CharacterClass::Rogue);
        assert_eq!(
            s.buy("excalibur"),
            Err(GameError::ItemNotFound("excalibur".to_string()))
        );
        assert_eq!(
            s.use_item("excalibur"),
            Err(GameError::ItemNotFound("excalibur".to_string()))
        );
    }

    #[test]
    fn test_equip_picks_slot_from_kind() {
        let mut s = session(CharacterClass::Warrior);
        s.character_mut().inventory.push("leather_armor".to_string());
        s.character_mut().inventory.push("iron_sword".to_string());

        assert_eq!(s.equip("leather_armor").unwrap(), None);
        assert_eq!(s.equip("iron_sword").unwrap(), None);
        assert_eq!(s.character().max_health, 135);
        assert_eq!(s.character().strength, 20);
        assert!(s.character().inventory.is_empty());

        assert_eq!(
            s.unequip(EquipmentSlot::Weapon).unwrap(),
            Some("iron_sword".to_string())
        );
        assert_eq!(s.character().strength, 15);
    }

    #[test]
    fn test_equip_consumable_is_rejected() {
        let mut s = session(CharacterClass::Cleric);
        s.character_mut().inventory.push("health_potion".to_string());
        let before = s.character().clone();
        assert!(matches!(
            s.equip("health_potion"),
            Err(GameError::InvalidItemType { .. })
        ));
        assert_eq!(s.character(), &before);
    }

    #[test]
    fn test_use_potion() {
        let mut s = session(CharacterClass::Cleric);
        s.character_mut().inventory.push("health_potion".to_string());
        s.character_mut().health = 50;
        assert_eq!(s.use_item("health_potion").unwrap(), ItemUse::Healed(20));
        assert_eq!(s.character().health, 70);
    }

    #[test]
    fn test_quest_flow() {
        let mut s = session(CharacterClass::Warrior);
        s.accept_quest("first_steps").unwrap();
        let reward = s.complete_quest("first_steps").unwrap();
        assert_eq!(s.character().gold, reward.gold);
        assert_eq!(
            s.complete_quest("first_steps"),
            Err(GameError::QuestNotActive("first_steps".to_string()))
        );

        s.accept_quest("goblin_menace").unwrap();
        s.abandon_quest("goblin_menace").unwrap();
        assert!(s.character().active_quests.is_empty());
    }
}
