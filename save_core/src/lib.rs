//! save_core - Character persistence for Quest Chronicles
//!
//! This crate provides:
//! - CharacterStore: the save/load/list/delete interface the driver uses
//! - JsonFileStore: one JSON file per character, written atomically
//! - MemoryStore: an in-memory store for tests and diskless drivers
//!
//! ```rust,ignore
//! use save_core::{CharacterStore, JsonFileStore};
//!
//! let mut store = JsonFileStore::new("saves")?;
//! store.save(&hero)?;
//! let names = store.list()?;
//! let hero = store.load(&names[0])?;
//! ```

mod file_store;
mod memory_store;

pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;

use hero_core::Character;
use std::path::PathBuf;
use thiserror::Error;

/// Error reading or writing saved characters
///
/// `Io` failures are worth retrying; the in-memory character is still valid.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("No saved character named '{0}'")]
    NotFound(String),
    #[error("Save for '{name}' is corrupted: {message}")]
    Corrupted { name: String, message: String },
    #[error("Storage I/O error on '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
}

/// Persistent storage for characters, keyed by character name
pub trait CharacterStore {
    /// Write a character, replacing any earlier save with the same name
    fn save(&mut self, character: &Character) -> Result<(), StorageError>;

    /// Read a character back; fails with `NotFound` or `Corrupted`
    fn load(&self, name: &str) -> Result<Character, StorageError>;

    /// Names of all saved characters, sorted
    fn list(&self) -> Result<Vec<String>, StorageError>;

    fn delete(&mut self, name: &str) -> Result<(), StorageError>;

    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.list()?.iter().any(|saved| saved == name))
    }
}

/// Serialize a character the same way for every store
pub(crate) fn encode(character: &Character) -> Result<String, StorageError> {
    serde_json::to_string_pretty(character).map_err(|e| StorageError::Corrupted {
        name: character.name.clone(),
        message: e.to_string(),
    })
}

/// Parse and validate a saved record
pub(crate) fn decode(name: &str, contents: &str) -> Result<Character, StorageError> {
    let character: Character =
        serde_json::from_str(contents).map_err(|e| StorageError::Corrupted {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    character.validate().map_err(|e| StorageError::Corrupted {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    if character.name != name {
        return Err(StorageError::Corrupted {
            name: name.to_string(),
            message: format!("record belongs to '{}'", character.name),
        });
    }
    Ok(character)
}
