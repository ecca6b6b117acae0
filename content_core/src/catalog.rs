use crate::config::{ItemFileConfig, QuestFileConfig};
use crate::item::{Item, ItemKind, Stat, StatEffect};
use crate::quest::Quest;
use crate::ContentError;
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const DEFAULT_QUESTS_FILE: &str = "quests.toml";
pub const DEFAULT_ITEMS_FILE: &str = "items.toml";

/// Read-only registry of quest and item definitions
///
/// Entries keep the order they were defined in, so shop and quest listings
/// are stable between runs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    quests: Vec<Quest>,
    quest_index: HashMap<String, usize>,
    items: Vec<Item>,
    item_index: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from already-validated definitions
    pub fn from_parts(quests: Vec<Quest>, items: Vec<Item>) -> Self {
        let quest_index = quests
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), i))
            .collect();
        let item_index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.clone(), i))
            .collect();
        Catalog {
            quests,
            quest_index,
            items,
            item_index,
        }
    }

    /// Load quests and items from two TOML files
    pub fn load(quests_path: &Path, items_path: &Path) -> Result<Self, ContentError> {
        let quests = Self::load_quests(quests_path)?;
        let items = Self::load_items(items_path)?;
        info!("Loaded {} quests and {} items", quests.len(), items.len());
        Ok(Self::from_parts(quests, items))
    }

    /// Load quests from a directory holding the default file names
    pub fn load_dir(dir: &Path) -> Result<Self, ContentError> {
        Self::load(&dir.join(DEFAULT_QUESTS_FILE), &dir.join(DEFAULT_ITEMS_FILE))
    }

    /// Load and validate a quest file
    pub fn load_quests(path: &Path) -> Result<Vec<Quest>, ContentError> {
        let content = read_content(path)?;
        parse_quests(&content, path)
    }

    /// Load and validate an item file
    pub fn load_items(path: &Path) -> Result<Vec<Item>, ContentError> {
        let content = read_content(path)?;
        parse_items(&content, path)
    }

    /// The content a fresh install starts with
    pub fn builtin() -> Self {
        Self::from_parts(builtin_quests(), builtin_items())
    }

    /// Get a quest by ID
    pub fn quest(&self, id: &str) -> Option<&Quest> {
        self.quest_index.get(id).map(|&i| &self.quests[i])
    }

    /// Get an item by ID
    pub fn item(&self, id: &str) -> Option<&Item> {
        self.item_index.get(id).map(|&i| &self.items[i])
    }

    pub fn contains_quest(&self, id: &str) -> bool {
        self.quest_index.contains_key(id)
    }

    pub fn contains_item(&self, id: &str) -> bool {
        self.item_index.contains_key(id)
    }

    /// All quests in definition order
    pub fn quests(&self) -> impl Iterator<Item = &Quest> {
        self.quests.iter()
    }

    /// All items in definition order
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn quest_count(&self) -> usize {
        self.quests.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

fn read_content(path: &Path) -> Result<String, ContentError> {
    if !path.exists() {
        return Err(ContentError::MissingContent {
            path: path.to_path_buf(),
        });
    }

    debug!("Reading content file {:?}", path);
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::ContentCorrupted {
        error: e,
        path: path.to_path_buf(),
    })?;

    if content.trim().is_empty() {
        return Err(ContentError::invalid(path, "file is empty"));
    }
    Ok(content)
}

/// Parse and validate quest definitions from TOML text
///
/// `origin` is only used in error messages.
pub(crate) fn parse_quests(content: &str, origin: &Path) -> Result<Vec<Quest>, ContentError> {
    let config: QuestFileConfig =
        toml::from_str(content).map_err(|e| ContentError::invalid(origin, e.to_string()))?;

    let mut quests = Vec::with_capacity(config.quests.len());
    let mut seen = HashSet::new();
    for entry in config.quests {
        let quest = Quest::from_config(entry).map_err(|m| ContentError::invalid(origin, m))?;
        if !seen.insert(quest.id.clone()) {
            return Err(ContentError::invalid(
                origin,
                format!("duplicate quest id '{}'", quest.id),
            ));
        }
        quests.push(quest);
    }

    validate_prerequisites(&quests).map_err(|m| ContentError::invalid(origin, m))?;
    Ok(quests)
}

/// Parse and validate item definitions from TOML text
pub(crate) fn parse_items(content: &str, origin: &Path) -> Result<Vec<Item>, ContentError> {
    let config: ItemFileConfig =
        toml::from_str(content).map_err(|e| ContentError::invalid(origin, e.to_string()))?;

    let mut items = Vec::with_capacity(config.items.len());
    let mut seen = HashSet::new();
    for entry in config.items {
        let item = Item::from_config(entry).map_err(|m| ContentError::invalid(origin, m))?;
        if !seen.insert(item.id.clone()) {
            return Err(ContentError::invalid(
                origin,
                format!("duplicate item id '{}'", item.id),
            ));
        }
        items.push(item);
    }
    Ok(items)
}

/// Every prerequisite must name a known quest and the graph must be acyclic
fn validate_prerequisites(quests: &[Quest]) -> Result<(), String> {
    let by_id: HashMap<&str, &Quest> = quests.iter().map(|q| (q.id.as_str(), q)).collect();

    for quest in quests {
        for prereq in &quest.prerequisites {
            if !by_id.contains_key(prereq.as_str()) {
                return Err(format!(
                    "quest '{}' requires unknown quest '{}'",
                    quest.id, prereq
                ));
            }
        }
    }

    // Depth-first search with an explicit in-progress set
    fn visit<'a>(
        id: &'a str,
        by_id: &HashMap<&'a str, &'a Quest>,
        visiting: &mut HashSet<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<(), String> {
        if done.contains(id) {
            return Ok(());
        }
        if !visiting.insert(id) {
            return Err(format!("prerequisite cycle through quest '{}'", id));
        }
        if let Some(&quest) = by_id.get(id) {
            for prereq in &quest.prerequisites {
                visit(prereq.as_str(), by_id, visiting, done)?;
            }
        }
        visiting.remove(id);
        done.insert(id);
        Ok(())
    }

    let mut visiting = HashSet::new();
    let mut done = HashSet::new();
    for quest in quests {
        visit(quest.id.as_str(), &by_id, &mut visiting, &mut done)?;
    }
    Ok(())
}

/// Write the builtin content as TOML files into `dir`
///
/// Existing files are left untouched.
pub fn write_default_content(dir: &Path) -> Result<(), ContentError> {
    std::fs::create_dir_all(dir).map_err(|e| ContentError::ContentCorrupted {
        error: e,
        path: dir.to_path_buf(),
    })?;

    let quests_path = dir.join(DEFAULT_QUESTS_FILE);
    if !quests_path.exists() {
        let file = QuestFileConfig {
            quests: builtin_quests().iter().map(Quest::to_config).collect(),
        };
        let text = toml::to_string_pretty(&file)
            .map_err(|e| ContentError::invalid(&quests_path, e.to_string()))?;
        write_file(&quests_path, &text)?;
        info!("Wrote default quests to {:?}", quests_path);
    }

    let items_path = dir.join(DEFAULT_ITEMS_FILE);
    if !items_path.exists() {
        let file = ItemFileConfig {
            items: builtin_items().iter().map(Item::to_config).collect(),
        };
        let text = toml::to_string_pretty(&file)
            .map_err(|e| ContentError::invalid(&items_path, e.to_string()))?;
        write_file(&items_path, &text)?;
        info!("Wrote default items to {:?}", items_path);
    }

    Ok(())
}

fn write_file(path: &Path, text: &str) -> Result<(), ContentError> {
    std::fs::write(path, text).map_err(|e| ContentError::ContentCorrupted {
        error: e,
        path: path.to_path_buf(),
    })
}

fn builtin_quests() -> Vec<Quest> {
    vec![
        Quest::new("first_steps", "First Steps")
            .with_description("Speak with the village elder and learn of the troubles ahead.")
            .with_rewards(50, 25),
        Quest::new("goblin_menace", "The Goblin Menace")
            .with_description("Drive the goblins away from the village farms.")
            .with_rewards(120, 60)
            .with_prerequisite("first_steps"),
        Quest::new("orc_warband", "Orc Warband")
            .with_description("Scatter the orc warband camped at the river ford.")
            .with_rewards(300, 150)
            .with_required_level(3)
            .with_prerequisite("goblin_menace"),
        Quest::new("lost_tome", "The Lost Tome")
            .with_description("Recover a spellbook from the ruined library.")
            .with_rewards(200, 100)
            .with_required_level(2)
            .with_prerequisite("first_steps"),
        Quest::new("dragon_slayer", "Dragon Slayer")
            .with_description("Face the dragon of the northern peaks.")
            .with_rewards(1000, 500)
            .with_required_level(6)
            .with_prerequisite("orc_warband")
            .with_prerequisite("lost_tome"),
    ]
}

fn builtin_items() -> Vec<Item> {
    vec![
        Item::new(
            "health_potion",
            "Health Potion",
            ItemKind::Consumable,
            StatEffect::new(Stat::Health, 20),
            25,
        )
        .with_description("Restores 20 health."),
        Item::new(
            "greater_health_potion",
            "Greater Health Potion",
            ItemKind::Consumable,
            StatEffect::new(Stat::Health, 60),
            70,
        )
        .with_description("Restores 60 health."),
        Item::new(
            "strength_tonic",
            "Strength Tonic",
            ItemKind::Consumable,
            StatEffect::new(Stat::Strength, 1),
            150,
        )
        .with_description("Permanently increases strength by 1."),
        Item::new(
            "iron_sword",
            "Iron Sword",
            ItemKind::Weapon,
            StatEffect::new(Stat::Strength, 5),
            100,
        )
        .with_description("A simple sword for beginners."),
        Item::new(
            "oak_staff",
            "Oak Staff",
            ItemKind::Weapon,
            StatEffect::new(Stat::Magic, 6),
            110,
        )
        .with_description("Channels magic more easily than bare hands."),
        Item::new(
            "leather_armor",
            "Leather Armor",
            ItemKind::Armor,
            StatEffect::new(Stat::MaxHealth, 15),
            80,
        )
        .with_description("Light armor that keeps you standing a little longer."),
        Item::new(
            "chain_mail",
            "Chain Mail",
            ItemKind::Armor,
            StatEffect::new(Stat::MaxHealth, 35),
            220,
        )
        .with_description("Heavy rings of iron."),
    ]
}
