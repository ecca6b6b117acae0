use crate::config::ItemConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an item is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
}

impl ItemKind {
    pub fn is_equipment(&self) -> bool {
        matches!(self, ItemKind::Weapon | ItemKind::Armor)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Weapon => write!(f, "weapon"),
            ItemKind::Armor => write!(f, "armor"),
            ItemKind::Consumable => write!(f, "consumable"),
        }
    }
}

/// Character stats an item effect can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}

impl Stat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "health" | "hp" => Ok(Stat::Health),
            "max_health" | "max_hp" => Ok(Stat::MaxHealth),
            "strength" => Ok(Stat::Strength),
            "magic" => Ok(Stat::Magic),
            other => Err(format!("unknown stat '{}'", other)),
        }
    }
}

/// A single stat modification, written as `stat:magnitude`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatEffect {
    pub stat: Stat,
    pub magnitude: i32,
}

impl StatEffect {
    pub fn new(stat: Stat, magnitude: i32) -> Self {
        StatEffect { stat, magnitude }
    }

    /// The effect that undoes this one
    pub fn inverse(&self) -> Self {
        StatEffect {
            stat: self.stat,
            magnitude: -self.magnitude,
        }
    }
}

impl fmt::Display for StatEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat, self.magnitude)
    }
}

impl FromStr for StatEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (stat, magnitude) = s
            .split_once(':')
            .ok_or_else(|| format!("effect '{}' is not in stat:value form", s))?;
        let stat: Stat = stat.parse()?;
        let magnitude: i32 = magnitude
            .trim()
            .parse()
            .map_err(|_| format!("effect magnitude '{}' is not an integer", magnitude.trim()))?;
        Ok(StatEffect { stat, magnitude })
    }
}

/// An item definition from the content catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub effect: StatEffect,
    pub cost: u32,
    pub description: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ItemKind,
        effect: StatEffect,
        cost: u32,
    ) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            kind,
            effect,
            cost,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Gold received when selling this item back
    pub fn sell_price(&self) -> u32 {
        self.cost / 2
    }

    pub(crate) fn from_config(config: ItemConfig) -> Result<Self, String> {
        let id = config.id.trim().to_string();
        if id.is_empty() {
            return Err("item id must not be empty".to_string());
        }
        if config.name.trim().is_empty() {
            return Err(format!("item '{}' has no name", id));
        }
        let effect: StatEffect = config
            .effect
            .parse()
            .map_err(|e| format!("item '{}': {}", id, e))?;

        Ok(Item {
            id,
            name: config.name,
            kind: config.kind,
            effect,
            cost: config.cost,
            description: config.description,
        })
    }

    pub(crate) fn to_config(&self) -> ItemConfig {
        ItemConfig {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            effect: self.effect.to_string(),
            cost: self.cost,
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_effect() {
        let effect: StatEffect = "strength:5".parse().unwrap();
        assert_eq!(effect, StatEffect::new(Stat::Strength, 5));

        let effect: StatEffect = " health : 20 ".parse().unwrap();
        assert_eq!(effect, StatEffect::new(Stat::Health, 20));

        let effect: StatEffect = "magic:-3".parse().unwrap();
        assert_eq!(effect.magnitude, -3);
    }

    #[test]
    fn test_parse_effect_rejects_malformed() {
        assert!("strength".parse::<StatEffect>().is_err());
        assert!("luck:5".parse::<StatEffect>().is_err());
        assert!("strength:five".parse::<StatEffect>().is_err());
    }

    #[test]
    fn test_effect_display_parses_back() {
        let effect = StatEffect::new(Stat::MaxHealth, 15);
        assert_eq!(effect.to_string(), "max_health:15");
        assert_eq!(effect.to_string().parse::<StatEffect>().unwrap(), effect);
    }

    #[test]
    fn test_inverse() {
        let effect = StatEffect::new(Stat::Magic, 4);
        assert_eq!(effect.inverse(), StatEffect::new(Stat::Magic, -4));
    }

    #[test]
    fn test_sell_price_floors() {
        let item = Item::new("ring", "Ring", ItemKind::Armor, StatEffect::new(Stat::Magic, 1), 25);
        assert_eq!(item.sell_price(), 12);
    }

    #[test]
    fn test_from_config_rejects_empty_id() {
        let config = ItemConfig {
            id: "  ".to_string(),
            name: "Nothing".to_string(),
            kind: ItemKind::Consumable,
            effect: "health:1".to_string(),
            cost: 1,
            description: String::new(),
        };
        assert!(Item::from_config(config).is_err());
    }
}
