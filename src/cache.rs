//! This module provides local key-value stores

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::traits::KeyValueStore;


/// A store that keeps every key in a single local JSON file
#[derive(Debug, PartialEq)]
pub struct FileStore {
    backing_file: PathBuf,
    data: StoredData,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
struct StoredData {
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let data = serde_json::from_reader(std::io::BufReader::new(file))?;

        Ok(Self {
            backing_file: PathBuf::from(path),
            data,
        })
    }

    /// Initialize an empty store, that will be saved to `path` on its first write
    pub fn new(path: &Path) -> Self {
        Self {
            backing_file: PathBuf::from(path),
            data: StoredData::default(),
        }
    }

    /// Initialize a store from its backing file, or an empty store in case the file is missing or invalid
    pub fn open(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(store) => store,
            Err(err) => {
                if path.exists() {
                    log::warn!("Invalid store file {:?}: {}. Using an empty store", path, err);
                } else {
                    log::debug!("No store file at {:?} yet", path);
                }
                Self::new(path)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.backing_file
    }

    /// Store the current content to the backing file
    fn save_to_file(&self) -> Result<()> {
        if let Some(parent) = self.backing_file.parent() {
            if parent.as_os_str().is_empty() == false {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(&self.backing_file)?;
        serde_json::to_writer(file, &self.data)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.data.entries.insert(key.to_string(), value);
        self.save_to_file()
    }
}


/// A store that only lives in memory. It is mostly useful for tests
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    n_writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times [`KeyValueStore::set`] has been called
    pub fn write_count(&self) -> usize {
        self.n_writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.n_writes += 1;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("book-planner-{}", uuid::Uuid::new_v4()))
            .join(name)
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = temp_path("store.json");

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("calendar"), None);
        store.set("calendar", r#"{"2026-01-01":[]}"#.to_string()).unwrap();
        store.set("plan", "{}".to_string()).unwrap();

        let reopened = FileStore::from_file(&path).unwrap();
        assert_eq!(reopened, store);
        assert_eq!(reopened.get("calendar").as_deref(), Some(r#"{"2026-01-01":[]}"#));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn invalid_file_gives_empty_store() {
        let path = temp_path("broken.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ this is not json").unwrap();

        assert!(FileStore::from_file(&path).is_err());
        let store = FileStore::open(&path);
        assert_eq!(store.get("calendar"), None);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        store.set("a", "1".to_string()).unwrap();
        store.set("a", "2".to_string()).unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);
    }
}
