//! Driver configuration loaded from `chronicles.toml`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "chronicles.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Failed to parse config file '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Where saves and content live, plus driver behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_saves_dir")]
    pub saves_dir: PathBuf,
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,
    #[serde(default = "default_quests_file")]
    pub quests_file: String,
    #[serde(default = "default_items_file")]
    pub items_file: String,
    /// Save after every menu action
    #[serde(default = "default_autosave")]
    pub autosave: bool,
    /// Used when no `-v` flag is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            saves_dir: default_saves_dir(),
            content_dir: default_content_dir(),
            quests_file: default_quests_file(),
            items_file: default_items_file(),
            autosave: default_autosave(),
            log_level: default_log_level(),
        }
    }
}

fn default_saves_dir() -> PathBuf {
    PathBuf::from("saves")
}
fn default_content_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_quests_file() -> String {
    content_core::DEFAULT_QUESTS_FILE.to_string()
}
fn default_items_file() -> String {
    content_core::DEFAULT_ITEMS_FILE.to_string()
}
fn default_autosave() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl GameConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            error,
            path: path.to_path_buf(),
        })?;
        Self::from_toml(&content).map_err(|error| ConfigError::Parse {
            error,
            path: path.to_path_buf(),
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the config, or fall back to defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write this config as TOML
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|error| ConfigError::Io {
            error,
            path: path.to_path_buf(),
        })
    }

    pub fn quests_path(&self) -> PathBuf {
        self.content_dir.join(&self.quests_file)
    }

    pub fn items_path(&self) -> PathBuf {
        self.content_dir.join(&self.items_file)
    }

    pub fn log_filter(&self) -> Option<log::LevelFilter> {
        self.log_level.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GameConfig::from_toml("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.quests_path(), PathBuf::from("data/quests.toml"));
        assert!(config.autosave);
    }

    #[test]
    fn test_partial_config() {
        let config = GameConfig::from_toml(
            r#"
            saves_dir = "/var/games/chronicles"
            autosave = false
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.saves_dir, PathBuf::from("/var/games/chronicles"));
        assert!(!config.autosave);
        assert_eq!(config.log_filter(), Some(log::LevelFilter::Debug));
        assert_eq!(config.items_file, "items.toml");
    }

    #[test]
    fn test_bad_log_level() {
        let config = GameConfig::from_toml("log_level = \"chatty\"").unwrap();
        assert_eq!(config.log_filter(), None);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let config = GameConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = GameConfig {
            content_dir: PathBuf::from("content"),
            autosave: false,
            ..GameConfig::default()
        };
        config.write(&path).unwrap();
        assert_eq!(GameConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "autosave = \"sometimes\"").unwrap();
        assert!(matches!(
            GameConfig::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
