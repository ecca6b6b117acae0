use crate::{decode, encode, CharacterStore, StorageError};
use hero_core::Character;
use std::collections::BTreeMap;

/// Characters kept as serialized JSON in memory
///
/// Records go through the same encoding as [`JsonFileStore`](crate::JsonFileStore),
/// so round-trip behavior matches the file store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CharacterStore for MemoryStore {
    fn save(&mut self, character: &Character) -> Result<(), StorageError> {
        let contents = encode(character)?;
        self.records.insert(character.name.clone(), contents);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Character, StorageError> {
        let contents = self
            .records
            .get(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;
        decode(name, contents)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.records.keys().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        self.records
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }
}
