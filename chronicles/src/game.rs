//! Interactive menus
//!
//! The game reads one choice per line and writes plain text, so tests can
//! drive it with a scripted input buffer. End of input backs out of every
//! menu.

use crate::display;
use anyhow::Result;
use content_core::Catalog;
use hero_core::combat::PlayerAction;
use hero_core::quest::{quest_status, QuestStatus};
use hero_core::{BattleOutcome, Character, CharacterClass, EquipmentSlot, GameSession};
use log::{info, warn};
use rand::Rng;
use save_core::CharacterStore;
use std::io::{BufRead, Write};

pub struct Game<'a, R, W, G> {
    input: R,
    output: W,
    rng: G,
    store: &'a mut dyn CharacterStore,
    catalog: Catalog,
    autosave: bool,
}

impl<'a, R: BufRead, W: Write, G: Rng> Game<'a, R, W, G> {
    pub fn new(
        input: R,
        output: W,
        rng: G,
        store: &'a mut dyn CharacterStore,
        catalog: Catalog,
    ) -> Self {
        Game {
            input,
            output,
            rng,
            store,
            catalog,
            autosave: true,
        }
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Main menu loop; returns when the player exits or input runs out
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== MAIN MENU ===")?;
            writeln!(self.output, "1. New Game")?;
            writeln!(self.output, "2. Load Game")?;
            writeln!(self.output, "3. Exit")?;
            match self.choose("Enter choice (1-3): ", 3)? {
                Some(1) => self.new_game()?,
                Some(2) => self.load_game()?,
                _ => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
            }
        }
    }

    fn new_game(&mut self) -> Result<()> {
        writeln!(self.output, "\n=== NEW GAME ===")?;
        let Some(name) = self.prompt("Enter your character's name: ")? else {
            return Ok(());
        };
        let classes: Vec<String> = CharacterClass::all().iter().map(|c| c.to_string()).collect();
        writeln!(self.output, "Choose a class: {}", classes.join(" | "))?;
        let Some(class) = self.prompt("Enter class: ")? else {
            return Ok(());
        };

        let character = match class
            .parse::<CharacterClass>()
            .and_then(|class| Character::new(name, class))
        {
            Ok(character) => character,
            Err(e) => {
                writeln!(self.output, "Error: {}", e)?;
                return Ok(());
            }
        };
        match self.store.exists(&character.name) {
            Ok(true) => {
                writeln!(
                    self.output,
                    "A character named '{}' already exists.",
                    character.name
                )?;
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => warn!("Could not check for existing save: {}", e),
        }

        writeln!(
            self.output,
            "\nCharacter '{}' the {} created!",
            character.name, character.class
        )?;
        info!("Created {} the {}", character.name, character.class);
        let mut session = GameSession::new(character, self.catalog.clone());
        self.save(&session)?;
        self.play(&mut session)
    }

    fn load_game(&mut self) -> Result<()> {
        writeln!(self.output, "\n=== LOAD GAME ===")?;
        let names = match self.store.list() {
            Ok(names) => names,
            Err(e) => {
                writeln!(self.output, "Could not list saves: {}", e)?;
                return Ok(());
            }
        };
        if names.is_empty() {
            writeln!(self.output, "No saved characters found.")?;
            return Ok(());
        }
        for (i, name) in names.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, name)?;
        }

        let prompt = format!("Select character (1-{}): ", names.len());
        let Some(choice) = self.choose(&prompt, names.len())? else {
            return Ok(());
        };
        match self.store.load(&names[choice - 1]) {
            Ok(character) => {
                writeln!(self.output, "\nLoaded character: {}", character.name)?;
                info!("Loaded {}", character.name);
                let mut session = GameSession::new(character, self.catalog.clone());
                self.play(&mut session)
            }
            Err(e) => {
                writeln!(self.output, "Could not load: {}", e)?;
                Ok(())
            }
        }
    }

    fn play(&mut self, session: &mut GameSession) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== GAME MENU ===")?;
            writeln!(self.output, "1. View Character Stats")?;
            writeln!(self.output, "2. Inventory")?;
            writeln!(self.output, "3. Quests")?;
            writeln!(self.output, "4. Explore (Find Battles)")?;
            writeln!(self.output, "5. Shop")?;
            writeln!(self.output, "6. Save and Quit")?;

            match self.choose("Enter choice (1-6): ", 6)? {
                Some(1) => {
                    let sheet = display::character_sheet(session.character(), session.catalog());
                    writeln!(self.output, "\n{}", sheet)?;
                }
                Some(2) => self.inventory_menu(session)?,
                Some(3) => self.quest_menu(session)?,
                Some(4) => self.explore(session)?,
                Some(5) => self.shop(session)?,
                Some(_) => {
                    if self.save(session)? {
                        writeln!(self.output, "Game saved. Goodbye!")?;
                    }
                    return Ok(());
                }
                None => {
                    self.save(session)?;
                    return Ok(());
                }
            }

            if self.autosave {
                self.save(session)?;
            }
        }
    }

    fn inventory_menu(&mut self, session: &mut GameSession) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== INVENTORY ===")?;
            self.list_inventory(session)?;
            writeln!(self.output, "\n1. Use Item")?;
            writeln!(self.output, "2. Equip Item")?;
            writeln!(self.output, "3. Unequip")?;
            writeln!(self.output, "4. Drop Item")?;
            writeln!(self.output, "5. Back")?;

            let outcome = match self.choose("Enter choice (1-5): ", 5)? {
                Some(1) => {
                    let Some(item_id) = self.select_item(session)? else {
                        continue;
                    };
                    let name = display::item_name(session.catalog(), &item_id);
                    session
                        .use_item(&item_id)
                        .map(|used| display::item_use(&name, &used))
                }
                Some(2) => {
                    let Some(item_id) = self.select_item(session)? else {
                        continue;
                    };
                    let name = display::item_name(session.catalog(), &item_id);
                    session.equip(&item_id).map(|replaced| match replaced {
                        Some(old) => format!(
                            "You equipped {}, replacing {}.",
                            name,
                            display::item_name(session.catalog(), &old)
                        ),
                        None => format!("You equipped {}.", name),
                    })
                }
                Some(3) => {
                    writeln!(self.output, "1. Weapon\n2. Armor")?;
                    let slot = match self.choose("Slot (1-2): ", 2)? {
                        Some(1) => EquipmentSlot::Weapon,
                        Some(_) => EquipmentSlot::Armor,
                        None => continue,
                    };
                    session.unequip(slot).map(|removed| match removed {
                        Some(id) => format!(
                            "You unequipped {}.",
                            display::item_name(session.catalog(), &id)
                        ),
                        None => format!("Nothing is equipped as {}.", slot),
                    })
                }
                Some(4) => {
                    let Some(item_id) = self.select_item(session)? else {
                        continue;
                    };
                    let name = display::item_name(session.catalog(), &item_id);
                    session
                        .drop_item(&item_id)
                        .map(|()| format!("You dropped {}.", name))
                }
                _ => return Ok(()),
            };
            self.report(outcome)?;
        }
    }

    fn quest_menu(&mut self, session: &mut GameSession) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== QUESTS ===")?;
            let character = session.character();
            let catalog = session.catalog();
            let active = character.active_quests.clone();
            let not_started: Vec<String> = catalog
                .quests()
                .filter(|q| quest_status(character, &q.id) == QuestStatus::NotStarted)
                .map(|q| q.id.clone())
                .collect();

            writeln!(self.output, "Active:")?;
            for (i, id) in active.iter().enumerate() {
                writeln!(self.output, "  {}. {}", i + 1, display::quest_summary(catalog, id))?;
            }
            writeln!(self.output, "Completed:")?;
            for id in &character.completed_quests {
                writeln!(self.output, "  - {}", display::quest_summary(catalog, id))?;
            }
            writeln!(self.output, "Not started:")?;
            for (i, id) in not_started.iter().enumerate() {
                writeln!(self.output, "  {}. {}", i + 1, display::quest_summary(catalog, id))?;
            }

            writeln!(self.output, "\n1. Accept Quest")?;
            writeln!(self.output, "2. Complete Quest")?;
            writeln!(self.output, "3. Abandon Quest")?;
            writeln!(self.output, "4. Back")?;

            let outcome = match self.choose("Enter choice (1-4): ", 4)? {
                Some(1) => {
                    let Some(id) = self.pick("Quest to accept", &not_started)? else {
                        continue;
                    };
                    session
                        .accept_quest(&id)
                        .map(|()| format!("Quest accepted: {}", id))
                }
                Some(2) => {
                    let Some(id) = self.pick("Quest to complete", &active)? else {
                        continue;
                    };
                    session.complete_quest(&id).map(|reward| {
                        let mut message = format!(
                            "Quest complete! +{} XP, +{} gold.",
                            reward.xp, reward.gold
                        );
                        if let Some(line) = display::level_up(&reward.level_up) {
                            message.push('\n');
                            message.push_str(&line);
                        }
                        message
                    })
                }
                Some(3) => {
                    let Some(id) = self.pick("Quest to abandon", &active)? else {
                        continue;
                    };
                    session
                        .abandon_quest(&id)
                        .map(|()| format!("Quest abandoned: {}", id))
                }
                _ => return Ok(()),
            };
            self.report(outcome)?;
        }
    }

    fn explore(&mut self, session: &mut GameSession) -> Result<()> {
        let mut battle = match session.explore() {
            Ok(battle) => battle,
            Err(e) => {
                writeln!(self.output, "{}", e)?;
                return Ok(());
            }
        };
        writeln!(self.output, "\nA wild {} appears!", battle.enemy().name)?;
        let ability = hero_core::combat::SpecialAbility::for_class(session.character().class);

        while battle.is_active() {
            writeln!(
                self.output,
                "\n{}",
                display::combat_status(session.character(), battle.enemy())
            )?;
            writeln!(self.output, "1. Attack")?;
            writeln!(self.output, "2. {}", ability)?;
            writeln!(self.output, "3. Flee")?;
            let action = match self.choose("Your move (1-3): ", 3)? {
                Some(1) => PlayerAction::Attack,
                Some(2) => PlayerAction::Special,
                Some(_) => PlayerAction::Flee,
                None => return Ok(()),
            };

            match battle.play_round(session.character_mut(), action, &mut self.rng) {
                Ok(report) => {
                    for event in &report.events {
                        let line =
                            display::combat_event(event, session.character(), battle.enemy());
                        writeln!(self.output, "{}", line)?;
                    }
                }
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }

        let Some(result) = battle.result() else {
            return Ok(());
        };
        match result.outcome {
            BattleOutcome::PlayerWon => {
                writeln!(
                    self.output,
                    "Victory! You gain {} XP and {} gold.",
                    result.xp_gained, result.gold_gained
                )?;
                match session.apply_battle_result(&result) {
                    Ok(report) => {
                        if let Some(line) = display::level_up(&report) {
                            writeln!(self.output, "{}", line)?;
                        }
                    }
                    Err(e) => writeln!(self.output, "{}", e)?,
                }
            }
            BattleOutcome::EnemyWon => {
                writeln!(self.output, "You were defeated by the {}...", battle.enemy().name)?;
                if session.revive() {
                    writeln!(
                        self.output,
                        "You wake up with {} health.",
                        session.character().health
                    )?;
                }
            }
            BattleOutcome::Escaped => {}
        }
        Ok(())
    }

    fn shop(&mut self, session: &mut GameSession) -> Result<()> {
        let stock: Vec<String> = session.catalog().items().map(|i| i.id.clone()).collect();
        loop {
            writeln!(self.output, "\n=== SHOP ===")?;
            writeln!(self.output, "Gold: {}", session.character().gold)?;
            for (i, item) in session.catalog().items().enumerate() {
                writeln!(
                    self.output,
                    "{}. {} - {} gold ({}, {})",
                    i + 1,
                    item.name,
                    item.cost,
                    item.kind,
                    item.effect
                )?;
            }
            writeln!(self.output, "\n1. Buy Item")?;
            writeln!(self.output, "2. Sell Item")?;
            writeln!(self.output, "3. Back")?;

            let outcome = match self.choose("Enter choice (1-3): ", 3)? {
                Some(1) => {
                    let Some(item_id) = self.pick("Item to buy", &stock)? else {
                        continue;
                    };
                    let name = display::item_name(session.catalog(), &item_id);
                    session
                        .buy(&item_id)
                        .map(|left| format!("Bought {}. {} gold left.", name, left))
                }
                Some(2) => {
                    self.list_inventory(session)?;
                    let Some(item_id) = self.select_item(session)? else {
                        continue;
                    };
                    let name = display::item_name(session.catalog(), &item_id);
                    session
                        .sell(&item_id)
                        .map(|price| format!("Sold {} for {} gold.", name, price))
                }
                _ => return Ok(()),
            };
            self.report(outcome)?;
        }
    }

    fn list_inventory(&mut self, session: &GameSession) -> Result<()> {
        let inventory = &session.character().inventory;
        if inventory.is_empty() {
            writeln!(self.output, "Inventory is empty.")?;
        }
        for (i, item_id) in inventory.iter().enumerate() {
            let kind = session
                .catalog()
                .item(item_id)
                .map(|item| item.kind.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            writeln!(
                self.output,
                "{}. {} ({})",
                i + 1,
                display::item_name(session.catalog(), item_id),
                kind
            )?;
        }
        Ok(())
    }

    fn select_item(&mut self, session: &GameSession) -> Result<Option<String>> {
        let inventory = session.character().inventory.clone();
        self.pick("Item", &inventory)
    }

    fn report<E: std::fmt::Display>(&mut self, outcome: Result<String, E>) -> Result<()> {
        match outcome {
            Ok(message) => writeln!(self.output, "{}", message)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(())
    }

    /// Save the session's character; failures are reported, never fatal
    fn save(&mut self, session: &GameSession) -> Result<bool> {
        match self.store.save(session.character()) {
            Ok(()) => Ok(true),
            Err(e) => {
                warn!("Save failed for '{}': {}", session.character().name, e);
                writeln!(self.output, "Warning: could not save ({})", e)?;
                Ok(false)
            }
        }
    }

    /// Choose one of `options` by number
    fn pick(&mut self, label: &str, options: &[String]) -> Result<Option<String>> {
        if options.is_empty() {
            writeln!(self.output, "Nothing to choose from.")?;
            return Ok(None);
        }
        let choice = self.choose(&format!("{} (1-{}): ", label, options.len()), options.len())?;
        Ok(choice.map(|n| options[n - 1].clone()))
    }

    /// Ask for a number in `1..=max` until one is given or input ends
    fn choose(&mut self, prompt: &str, max: usize) -> Result<Option<usize>> {
        loop {
            let Some(line) = self.prompt(prompt)? else {
                return Ok(None);
            };
            match line.parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => return Ok(Some(n)),
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    fn prompt(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use save_core::MemoryStore;
    use std::io::Cursor;

    fn run_script(store: &mut MemoryStore, script: &[&str]) -> String {
        let input = Cursor::new(script.join("\n") + "\n");
        let mut output = Vec::new();
        Game::new(
            input,
            &mut output,
            ChaCha8Rng::seed_from_u64(1),
            store,
            Catalog::builtin(),
        )
        .run()
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_end_of_input_exits() {
        let mut store = MemoryStore::new();
        let out = run_script(&mut store, &[]);
        assert!(out.contains("=== MAIN MENU ==="));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_new_game_quest_flow_is_saved() {
        let mut store = MemoryStore::new();
        let out = run_script(
            &mut store,
            &[
                "1", "Aria", "warrior", // new game
                "3", "1", "1", // accept first_steps
                "2", "1", // complete it
                "4", // back
                "6", // save and quit
                "3", // exit
            ],
        );
        assert!(out.contains("Character 'Aria' the Warrior created!"));
        assert!(out.contains("Quest complete! +50 XP, +25 gold."));

        let saved = store.load("Aria").unwrap();
        assert_eq!(saved.completed_quests, vec!["first_steps"]);
        assert!(saved.active_quests.is_empty());
        assert_eq!(saved.gold, 25);
        assert_eq!(saved.experience, 50);
    }

    #[test]
    fn test_invalid_class_returns_to_menu() {
        let mut store = MemoryStore::new();
        let out = run_script(&mut store, &["1", "Aria", "bard", "3"]);
        assert!(out.contains("Invalid character class: bard"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_battle_rewards_are_saved() {
        let mut store = MemoryStore::new();
        store
            .save(&Character::new("Bram", CharacterClass::Warrior).unwrap())
            .unwrap();
        // Warrior deals 13 per hit to a 50 health goblin
        let out = run_script(&mut store, &["2", "1", "4", "1", "1", "1", "1", "6", "3"]);
        assert!(out.contains("A wild Goblin appears!"));
        assert!(out.contains("Victory! You gain 25 XP and 10 gold."));

        let saved = store.load("Bram").unwrap();
        assert_eq!(saved.experience, 25);
        assert_eq!(saved.gold, 10);
        // Three goblin counterattacks of 8 - 15/4
        assert_eq!(saved.health, 105);
    }

    #[test]
    fn test_defeat_revives() {
        let mut store = MemoryStore::new();
        let mut bram = Character::new("Bram", CharacterClass::Warrior).unwrap();
        bram.health = 1;
        store.save(&bram).unwrap();

        let out = run_script(&mut store, &["2", "1", "4", "1", "6", "3"]);
        assert!(out.contains("You were defeated by the Goblin..."));
        assert!(out.contains("You wake up with 60 health."));

        let saved = store.load("Bram").unwrap();
        assert_eq!(saved.health, 60);
        assert_eq!(saved.gold, 0);
    }

    #[test]
    fn test_shop_errors_are_reported() {
        let mut store = MemoryStore::new();
        let mut bram = Character::new("Bram", CharacterClass::Rogue).unwrap();
        bram.gold = 30;
        store.save(&bram).unwrap();

        let out = run_script(
            &mut store,
            &[
                "2", "1", // load Bram
                "5", // shop
                "1", "4", // iron_sword costs 100
                "1", "1", // health_potion costs 25
                "3", // back
                "6", "3",
            ],
        );
        assert!(out.contains("Error: Insufficient funds: need 100 gold, have 30"));
        assert!(out.contains("Bought Health Potion. 5 gold left."));

        let saved = store.load("Bram").unwrap();
        assert_eq!(saved.inventory, vec!["health_potion"]);
        assert_eq!(saved.gold, 5);
    }

    #[test]
    fn test_invalid_menu_input_reprompts() {
        let mut store = MemoryStore::new();
        let out = run_script(&mut store, &["9", "abc", "3"]);
        assert_eq!(out.matches("Invalid choice.").count(), 2);
    }
}
