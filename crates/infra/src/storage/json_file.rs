//! Single-file JSON backend.
//!
//! All keys live in one JSON object (`{ "key": "value", ... }`) at
//! `{dir}/storage.json`. The file is read once on open; every write rewrites
//! it through a temp file + rename so a crash never leaves half a document.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use pocketledger_core::{KeyValueStore, StorageError, StorageResult};

pub const STORAGE_FILE_NAME: &str = "storage.json";

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store in `dir`.
    ///
    /// A missing file opens empty. So does a malformed one, with a warning;
    /// it is overwritten on the next write.
    pub fn open(dir: impl AsRef<Path>) -> StorageResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE_NAME);

        let entries: BTreeMap<String, String> = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), "storage file is malformed, starting empty: {err}");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "opened storage file");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        let payload = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, payload)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `change` and flush. On a failed flush the in-memory map is rolled
    /// back so it never runs ahead of the file.
    fn mutate<F>(&self, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        let previous = entries.clone();
        change(&mut *entries);

        if let Err(err) = self.flush(&entries) {
            *entries = previous;
            return Err(err);
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> StorageResult<()> {
        self.mutate(BTreeMap::clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("pocketledger-test-{}", uuid::Uuid::now_v7()))
    }

    #[test]
    fn values_survive_reopen() {
        let dir = temp_dir();
        {
            let store = JsonFileStore::open(&dir).unwrap();
            store.set("users", "[]").unwrap();
            store.set("theme", "\"dark\"").unwrap();
            store.remove("theme").unwrap();
        }

        let store = JsonFileStore::open(&dir).unwrap();
        assert_eq!(store.get("users").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("theme").unwrap(), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_dir_is_created() {
        let dir = temp_dir().join("nested");
        let store = JsonFileStore::open(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(store.get("anything").unwrap(), None);

        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[test]
    fn malformed_file_opens_empty() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(STORAGE_FILE_NAME), "{{{").unwrap();

        let store = JsonFileStore::open(&dir).unwrap();
        assert_eq!(store.get("users").unwrap(), None);

        store.set("users", "[]").unwrap();
        let reopened = JsonFileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("users").unwrap().as_deref(), Some("[]"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn clear_empties_the_file() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).unwrap();
        store.set("a", "1").unwrap();
        store.clear().unwrap();

        let reopened = JsonFileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("a").unwrap(), None);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn failed_flush_rolls_back_memory() {
        let dir = temp_dir();
        let store = JsonFileStore::open(&dir).unwrap();
        store.set("users", "[]").unwrap();

        fs::remove_dir_all(&dir).unwrap();

        let err = store.set("users", "[1]").unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert_eq!(store.get("users").unwrap().as_deref(), Some("[]"));

        assert!(matches!(store.remove("users"), Err(StorageError::Io(_))));
        assert!(matches!(store.clear(), Err(StorageError::Io(_))));
        assert_eq!(store.get("users").unwrap().as_deref(), Some("[]"));
    }
}
