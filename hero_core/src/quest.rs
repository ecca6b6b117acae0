//! Quest tracker - accepting, completing and abandoning quests
//!
//! Per character, a quest is `NotStarted`, `Active` or `Completed`.
//! Abandoning an active quest returns it to `NotStarted`.

use crate::character::Character;
use crate::error::GameError;
use crate::progression::{add_gold, gain_experience, LevelUp};
use content_core::{Catalog, Quest};
use std::collections::HashSet;

/// Where a character stands with a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestStatus {
    NotStarted,
    Active,
    Completed,
}

/// Rewards paid out by [`complete_quest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestReward {
    pub xp: u32,
    pub gold: u32,
    pub level_up: LevelUp,
}

/// Total rewards from every completed quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardTotals {
    pub xp: u64,
    pub gold: u64,
}

pub fn quest_status(character: &Character, quest_id: &str) -> QuestStatus {
    if character.completed_quests.iter().any(|id| id == quest_id) {
        QuestStatus::Completed
    } else if character.active_quests.iter().any(|id| id == quest_id) {
        QuestStatus::Active
    } else {
        QuestStatus::NotStarted
    }
}

/// Check every acceptance rule without changing anything
fn check_can_accept<'a>(
    character: &Character,
    catalog: &'a Catalog,
    quest_id: &str,
) -> Result<&'a Quest, GameError> {
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;

    match quest_status(character, quest_id) {
        QuestStatus::Completed => {
            return Err(GameError::QuestAlreadyCompleted(quest_id.to_string()))
        }
        QuestStatus::Active => return Err(GameError::QuestAlreadyAccepted(quest_id.to_string())),
        QuestStatus::NotStarted => {}
    }

    if character.level < quest.required_level {
        return Err(GameError::InsufficientLevel {
            required: quest.required_level,
            actual: character.level,
        });
    }

    if let Some(missing) = quest
        .prerequisites
        .iter()
        .find(|p| quest_status(character, p) != QuestStatus::Completed)
    {
        return Err(GameError::QuestRequirementsNotMet {
            quest_id: quest_id.to_string(),
            missing: missing.clone(),
        });
    }

    Ok(quest)
}

/// Start a quest
pub fn accept_quest(
    character: &mut Character,
    catalog: &Catalog,
    quest_id: &str,
) -> Result<(), GameError> {
    check_can_accept(character, catalog, quest_id)?;
    character.active_quests.push(quest_id.to_string());
    Ok(())
}

/// Finish an active quest and pay out its rewards
///
/// Gold is added directly; experience goes through [`gain_experience`], so
/// the reward can level the character up.
pub fn complete_quest(
    character: &mut Character,
    catalog: &Catalog,
    quest_id: &str,
) -> Result<QuestReward, GameError> {
    if quest_status(character, quest_id) != QuestStatus::Active {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    let quest = catalog
        .quest(quest_id)
        .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;

    let mut next = character.clone();
    next.active_quests.retain(|id| id != quest_id);
    next.completed_quests.push(quest_id.to_string());
    add_gold(&mut next, i64::from(quest.reward_gold))?;
    let level_up = gain_experience(&mut next, quest.reward_xp)?;

    *character = next;
    Ok(QuestReward {
        xp: quest.reward_xp,
        gold: quest.reward_gold,
        level_up,
    })
}

/// Give up an active quest; no reward, and it can be accepted again later
pub fn abandon_quest(character: &mut Character, quest_id: &str) -> Result<(), GameError> {
    if quest_status(character, quest_id) != QuestStatus::Active {
        return Err(GameError::QuestNotActive(quest_id.to_string()));
    }
    character.active_quests.retain(|id| id != quest_id);
    Ok(())
}

pub fn can_accept(character: &Character, catalog: &Catalog, quest_id: &str) -> bool {
    check_can_accept(character, catalog, quest_id).is_ok()
}

/// Quests the character could accept right now, in catalog order
pub fn available_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a Quest> {
    catalog
        .quests()
        .filter(|q| can_accept(character, catalog, &q.id))
        .collect()
}

/// Active quests that still exist in the catalog
pub fn active_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a Quest> {
    character
        .active_quests
        .iter()
        .filter_map(|id| catalog.quest(id))
        .collect()
}

/// Completed quests that still exist in the catalog
pub fn completed_quests<'a>(character: &Character, catalog: &'a Catalog) -> Vec<&'a Quest> {
    character
        .completed_quests
        .iter()
        .filter_map(|id| catalog.quest(id))
        .collect()
}

/// Share of catalog quests completed, 0.0 to 100.0
pub fn completion_percentage(character: &Character, catalog: &Catalog) -> f64 {
    let total = catalog.quest_count();
    if total == 0 {
        return 0.0;
    }
    let done = completed_quests(character, catalog).len();
    done as f64 / total as f64 * 100.0
}

pub fn total_rewards_earned(character: &Character, catalog: &Catalog) -> RewardTotals {
    completed_quests(character, catalog)
        .into_iter()
        .fold(RewardTotals::default(), |acc, q| RewardTotals {
            xp: acc.xp + u64::from(q.reward_xp),
            gold: acc.gold + u64::from(q.reward_gold),
        })
}

/// Every quest leading up to `quest_id`, prerequisites first, ending with the quest itself
pub fn prerequisite_chain<'a>(
    catalog: &'a Catalog,
    quest_id: &str,
) -> Result<Vec<&'a Quest>, GameError> {
    fn visit<'a>(
        catalog: &'a Catalog,
        quest_id: &str,
        seen: &mut HashSet<String>,
        chain: &mut Vec<&'a Quest>,
    ) -> Result<(), GameError> {
        if !seen.insert(quest_id.to_string()) {
            return Ok(());
        }
        let quest = catalog
            .quest(quest_id)
            .ok_or_else(|| GameError::QuestNotFound(quest_id.to_string()))?;
        for prereq in &quest.prerequisites {
            visit(catalog, prereq, seen, chain)?;
        }
        chain.push(quest);
        Ok(())
    }

    let mut chain = Vec::new();
    visit(catalog, quest_id, &mut HashSet::new(), &mut chain)?;
    Ok(chain)
}
