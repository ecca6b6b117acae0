use crate::config::QuestConfig;
use serde::{Deserialize, Serialize};

/// A quest definition from the content catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u32,
    pub reward_gold: u32,
    pub required_level: u32,
    /// Quests that must be completed before this one can be accepted
    pub prerequisites: Vec<String>,
}

impl Quest {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Quest {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            reward_xp: 0,
            reward_gold: 0,
            required_level: 1,
            prerequisites: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rewards(mut self, xp: u32, gold: u32) -> Self {
        self.reward_xp = xp;
        self.reward_gold = gold;
        self
    }

    pub fn with_required_level(mut self, level: u32) -> Self {
        self.required_level = level;
        self
    }

    pub fn with_prerequisite(mut self, quest_id: impl Into<String>) -> Self {
        self.prerequisites.push(quest_id.into());
        self
    }

    pub(crate) fn from_config(config: QuestConfig) -> Result<Self, String> {
        let id = config.id.trim().to_string();
        if id.is_empty() {
            return Err("quest id must not be empty".to_string());
        }
        if config.title.trim().is_empty() {
            return Err(format!("quest '{}' has no title", id));
        }
        if config.required_level == 0 {
            return Err(format!("quest '{}' has required_level 0", id));
        }

        // "NONE" marks a quest without prerequisites in older content files
        let prerequisites: Vec<String> = config
            .prerequisites
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("none"))
            .collect();

        if prerequisites.iter().any(|p| *p == id) {
            return Err(format!("quest '{}' lists itself as a prerequisite", id));
        }

        Ok(Quest {
            id,
            title: config.title,
            description: config.description,
            reward_xp: config.reward_xp,
            reward_gold: config.reward_gold,
            required_level: config.required_level,
            prerequisites,
        })
    }

    pub(crate) fn to_config(&self) -> QuestConfig {
        QuestConfig {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            reward_xp: self.reward_xp,
            reward_gold: self.reward_gold,
            required_level: self.required_level,
            prerequisites: self.prerequisites.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: &str, prerequisites: &[&str]) -> QuestConfig {
        QuestConfig {
            id: id.to_string(),
            title: "Title".to_string(),
            description: String::new(),
            reward_xp: 10,
            reward_gold: 5,
            required_level: 1,
            prerequisites: prerequisites.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_none_prerequisite_is_dropped() {
        let quest = Quest::from_config(config("intro", &["NONE"])).unwrap();
        assert!(quest.prerequisites.is_empty());
    }

    #[test]
    fn test_self_prerequisite_rejected() {
        assert!(Quest::from_config(config("loop", &["loop"])).is_err());
    }

    #[test]
    fn test_zero_required_level_rejected() {
        let mut cfg = config("zero", &[]);
        cfg.required_level = 0;
        assert!(Quest::from_config(cfg).is_err());
    }
}
