//! Text rendering for engine results

use content_core::Catalog;
use hero_core::combat::{AbilityOutcome, CombatEvent};
use hero_core::inventory::ItemUse;
use hero_core::progression::LevelUp;
use hero_core::quest::{completion_percentage, prerequisite_chain};
use hero_core::{Character, Enemy, EquipmentSlot};

pub fn character_sheet(character: &Character, catalog: &Catalog) -> String {
    let mut lines = vec![
        format!("=== {} the {} ===", character.name, character.class),
        format!(
            "Level {} ({} XP, {} to next level)",
            character.level,
            character.experience,
            character.xp_to_next_level()
        ),
        format!("Health: {}/{}", character.health, character.max_health),
        format!(
            "Strength: {}  Magic: {}",
            character.strength, character.magic
        ),
        format!("Gold: {}", character.gold),
    ];
    for slot in EquipmentSlot::all() {
        let worn = match character.equipped(*slot) {
            Some(equipped) => format!(
                "{} ({})",
                item_name(catalog, &equipped.item_id),
                equipped.effect
            ),
            None => "nothing".to_string(),
        };
        lines.push(format!("{}: {}", slot, worn));
    }
    lines.push(format!(
        "Quests completed: {:.0}%",
        completion_percentage(character, catalog)
    ));
    lines.join("\n")
}

pub fn item_name(catalog: &Catalog, item_id: &str) -> String {
    catalog
        .item(item_id)
        .map(|item| item.name.clone())
        .unwrap_or_else(|| item_id.to_string())
}

pub fn combat_status(character: &Character, enemy: &Enemy) -> String {
    format!(
        "{}: {}/{} HP  |  {}: {}/{} HP",
        character.name,
        character.health,
        character.max_health,
        enemy.name,
        enemy.health,
        enemy.max_health
    )
}

pub fn combat_event(event: &CombatEvent, character: &Character, enemy: &Enemy) -> String {
    match event {
        CombatEvent::PlayerAttack { damage } => {
            format!("You hit the {} for {} damage.", enemy.name, damage)
        }
        CombatEvent::EnemyAttack { damage } => {
            format!("The {} hits {} for {} damage.", enemy.name, character.name, damage)
        }
        CombatEvent::Special { ability, outcome } => match outcome {
            AbilityOutcome::Damage(damage) => {
                format!("{}! The {} takes {} damage.", ability, enemy.name, damage)
            }
            AbilityOutcome::Missed => format!("{} misses!", ability),
            AbilityOutcome::Healed(amount) => format!("{} restores {} health.", ability, amount),
        },
        CombatEvent::EscapeFailed => "You try to flee but can't get away!".to_string(),
        CombatEvent::Escaped => "You escaped!".to_string(),
    }
}

pub fn item_use(name: &str, outcome: &ItemUse) -> String {
    match outcome {
        ItemUse::Healed(amount) => format!("You used {} and healed {} HP.", name, amount),
        ItemUse::StatChanged(effect) => format!(
            "You used {}. {} changed by {}.",
            name, effect.stat, effect.magnitude
        ),
    }
}

pub fn level_up(report: &LevelUp) -> Option<String> {
    report
        .leveled_up()
        .then(|| format!("LEVEL UP! You are now level {}.", report.new_level))
}

/// One line describing a quest and what it takes to start it
pub fn quest_summary(catalog: &Catalog, quest_id: &str) -> String {
    let Some(quest) = catalog.quest(quest_id) else {
        return quest_id.to_string();
    };
    let mut line = format!(
        "{} (Level {}, {} XP, {} gold)",
        quest.title, quest.required_level, quest.reward_xp, quest.reward_gold
    );
    if let Ok(chain) = prerequisite_chain(catalog, quest_id) {
        let before: Vec<&str> = chain
            .iter()
            .filter(|q| q.id != quest.id)
            .map(|q| q.title.as_str())
            .collect();
        if !before.is_empty() {
            line.push_str(&format!(" after: {}", before.join(" > ")));
        }
    }
    line
}
