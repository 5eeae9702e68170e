use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::{KeyValueStore, StorageError};

/// Keys and values kept as one JSON object in a single file
///
/// Writes go to a sibling temp file that is renamed over the original, so a
/// failed write never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(StorageError::Encoding(err)) => {
                log::warn!("Ignoring malformed store {:?}: {}", self.path, err);
                None
            }
            Err(err) => {
                log::error!("Failed to read store {:?}: {}", self.path, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // only malformed content may be replaced; a file we cannot read is left alone
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Encoding(err)) => {
                log::warn!("Replacing malformed store {:?}: {}", self.path, err);
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, serde_json::to_string_pretty(&entries)?)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));
        assert_eq!(store.get("users"), None);
    }

    #[test]
    fn test_values_survive_new_instance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::new(&path);
        store.set("users", "[1,2]").unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("users").as_deref(), Some("[1,2]"));
        assert_eq!(reopened.get("other").as_deref(), Some("x"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("users"), None);

        store.set("users", "[]").unwrap();
        assert_eq!(store.get("users").as_deref(), Some("[]"));
    }

    #[test]
    fn test_unreadable_store_refuses_write() {
        let dir = TempDir::new().unwrap();
        // a directory in place of the file: reads fail with something other than NotFound
        let path = dir.path().join("store.json");
        std::fs::create_dir(&path).unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("users"), None);
        assert!(matches!(store.set("users", "[]"), Err(StorageError::Io(_))));
        assert!(path.is_dir());
        assert!(!path.with_extension("tmp").exists());
    }
}
