//! content_core - Static game content for Quest Chronicles
//!
//! This crate provides:
//! - Item: weapons, armor and consumables with a single stat effect
//! - Quest: quest definitions with rewards, level gates and prerequisites
//! - EnemyKind: the fixed enemy templates and level-based selection
//! - Catalog: read-only registry of items and quests loaded from TOML
//!
//! ```rust,ignore
//! use content_core::Catalog;
//!
//! let catalog = Catalog::load(Path::new("data/quests.toml"), Path::new("data/items.toml"))?;
//! let potion = catalog.item("health_potion").unwrap();
//! println!("{} costs {} gold", potion.name, potion.cost);
//! ```

mod catalog;
mod config;
mod enemy;
mod item;
mod quest;

pub use catalog::{write_default_content, Catalog, DEFAULT_ITEMS_FILE, DEFAULT_QUESTS_FILE};
pub use enemy::{EnemyKind, EnemyTemplate, UnknownEnemy};
pub use item::{Item, ItemKind, Stat, StatEffect};
pub use quest::Quest;

use std::path::PathBuf;
use thiserror::Error;

/// Error loading content files
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Content file not found: '{path:?}'")]
    MissingContent { path: PathBuf },
    #[error("Could not read '{path:?}': {error}")]
    ContentCorrupted {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("Invalid content in '{path:?}': {message}")]
    InvalidContentFormat { message: String, path: PathBuf },
}

impl ContentError {
    pub(crate) fn invalid(path: &std::path::Path, message: impl Into<String>) -> Self {
        ContentError::InvalidContentFormat {
            message: message.into(),
            path: path.to_path_buf(),
        }
    }
}
