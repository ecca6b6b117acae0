use crate::{decode, encode, CharacterStore, StorageError};
use hero_core::Character;
use log::{debug, warn};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const SAVE_EXTENSION: &str = "json";

/// Characters saved as pretty-printed JSON, one file per character
///
/// File names are the percent-encoded character name, so any name maps to a
/// single file inside the save directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open a save directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|error| StorageError::Io {
            error,
            path: dir.clone(),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a character with this name is saved
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", safe_filename(name), SAVE_EXTENSION))
    }
}

impl CharacterStore for JsonFileStore {
    fn save(&mut self, character: &Character) -> Result<(), StorageError> {
        let path = self.path_for(&character.name);
        let contents = encode(character)?;
        write_atomic(&path, &contents).map_err(|error| StorageError::Io {
            error,
            path: path.clone(),
        })?;
        debug!("Saved '{}' to {:?}", character.name, path);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<Character, StorageError> {
        let path = self.path_for(name);
        let contents = fs::read_to_string(&path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io {
                    error,
                    path: path.clone(),
                }
            }
        })?;

        match decode(name, &contents) {
            Ok(character) => {
                debug!("Loaded '{}' from {:?}", name, path);
                Ok(character)
            }
            Err(e) => {
                warn!("Rejected save file {:?}: {}", path, e);
                Err(e)
            }
        }
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let io_error = |error: io::Error| StorageError::Io {
            error,
            path: self.dir.clone(),
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SAVE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match percent_decode_str(stem).decode_utf8() {
                Ok(name) => names.push(name.into_owned()),
                Err(_) => warn!("Skipping save file with undecodable name {:?}", path),
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name);
        fs::remove_file(&path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Io {
                    error,
                    path: path.clone(),
                }
            }
        })?;
        debug!("Deleted save {:?}", path);
        Ok(())
    }

    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.path_for(name).is_file())
    }
}

/// Percent-encode everything but ASCII alphanumerics
fn safe_filename(name: &str) -> String {
    utf8_percent_encode(name, NON_ALPHANUMERIC).to_string()
}

/// Write to a sibling temp file, then rename it over the target
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("save.json");

    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(contents.as_bytes())?;
                tmp.sync_all()?;
                break candidate;
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seasoned_hero;
    use hero_core::CharacterClass;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonFileStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("saves")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_round_trip_fresh_character() {
        let (_dir, mut store) = store();
        let hero = Character::new("Bram", CharacterClass::Warrior).unwrap();
        store.save(&hero).unwrap();

        let loaded = store.load("Bram").unwrap();
        assert_eq!(loaded, hero);
        assert!(loaded.inventory.is_empty());
        assert!(loaded.equipped_weapon.is_none());
    }

    #[test]
    fn test_round_trip_populated_character() {
        let (_dir, mut store) = store();
        let hero = seasoned_hero();
        store.save(&hero).unwrap();
        assert_eq!(store.load(&hero.name).unwrap(), hero);
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, mut store) = store();
        let mut hero = seasoned_hero();
        store.save(&hero).unwrap();
        hero.gold = 1;
        store.save(&hero).unwrap();
        assert_eq!(store.load(&hero.name).unwrap().gold, 1);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_names_are_percent_encoded() {
        let (_dir, store) = store();
        let path = store.path_for("../etc/passwd");
        assert_eq!(path.parent().unwrap(), store.dir());
        assert!(path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("%2E%2E%2Fetc"));
    }

    #[test]
    fn test_list_is_sorted_and_decoded() {
        let (_dir, mut store) = store();
        for name in ["Zed", "Aria Vell", "Mo"] {
            store
                .save(&Character::new(name, CharacterClass::Cleric).unwrap())
                .unwrap();
        }
        fs::write(store.dir().join("notes.txt"), "not a save").unwrap();

        assert_eq!(store.list().unwrap(), vec!["Aria Vell", "Mo", "Zed"]);
        assert!(store.exists("Mo").unwrap());
        assert!(!store.exists("Nobody").unwrap());
    }

    #[test]
    fn test_missing_character() {
        let (_dir, mut store) = store();
        assert!(matches!(store.load("Ghost"), Err(StorageError::NotFound(_))));
        assert!(matches!(store.delete("Ghost"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (_dir, mut store) = store();
        let hero = seasoned_hero();
        store.save(&hero).unwrap();
        store.delete(&hero.name).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.load(&hero.name), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_invalid_json_is_corrupted() {
        let (_dir, store) = store();
        fs::write(store.path_for("Bram"), "{ not json").unwrap();
        assert!(matches!(
            store.load("Bram"),
            Err(StorageError::Corrupted { .. })
        ));
    }

    #[test]
    fn test_invalid_character_is_corrupted() {
        let (_dir, mut store) = store();
        let hero = Character::new("Bram", CharacterClass::Warrior).unwrap();
        store.save(&hero).unwrap();

        let path = store.path_for("Bram");
        let tampered = fs::read_to_string(&path)
            .unwrap()
            .replace("\"health\": 120", "\"health\": 999");
        fs::write(&path, tampered).unwrap();

        match store.load("Bram") {
            Err(StorageError::Corrupted { name, message }) => {
                assert_eq!(name, "Bram");
                assert!(message.contains("exceeds max_health"));
            }
            other => panic!("expected Corrupted, got {:?}", other),
        }
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (_dir, mut store) = store();
        store.save(&seasoned_hero()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
