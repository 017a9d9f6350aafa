use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

pub const CSRF_TOKEN_KEY: &str = "csrf_token";
pub const THEME_KEY: &str = "theme";
pub const WISHLIST_KEY: &str = "wishlist";

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("local state I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("local state encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// String key-value storage with `localStorage` semantics.
pub trait LocalStore: Send + Sync + fmt::Debug {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;
    fn remove_item(&self, key: &str) -> Result<(), LocalStoreError>;
    /// Removes every key.
    fn clear(&self) -> Result<(), LocalStoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    items: RwLock<BTreeMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.read().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.items.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), LocalStoreError> {
        self.items.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), LocalStoreError> {
        self.items.write().clear();
        Ok(())
    }
}

/// JSON object on disk, rewritten through a sibling temp file on every
/// change.
#[derive(Debug)]
pub struct FileLocalStore {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileLocalStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LocalStoreError> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(
        &self,
        items: &BTreeMap<String, String>,
    ) -> Result<(), LocalStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_vec_pretty(items)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn mutate(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), LocalStoreError> {
        let mut items = self.items.lock();
        let mut next = items.clone();
        apply(&mut next);
        self.persist(&next)?;
        *items = next;
        Ok(())
    }
}

impl LocalStore for FileLocalStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        self.mutate(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), LocalStoreError> {
        self.mutate(|items| {
            items.remove(key);
        })
    }

    fn clear(&self) -> Result<(), LocalStoreError> {
        self.mutate(BTreeMap::clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basics() {
        let store = MemoryLocalStore::new();
        store.set_item(THEME_KEY, "dark").unwrap();
        assert_eq!(store.get_item(THEME_KEY).as_deref(), Some("dark"));
        store.remove_item(THEME_KEY).unwrap();
        assert_eq!(store.get_item(THEME_KEY), None);
    }

    #[test]
    fn file_store_survives_reopen_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("local.json");

        let store = FileLocalStore::open(&path).unwrap();
        store.set_item(CSRF_TOKEN_KEY, "abc").unwrap();
        store.set_item(THEME_KEY, "dark").unwrap();
        drop(store);

        let reopened = FileLocalStore::open(&path).unwrap();
        assert_eq!(reopened.get_item(CSRF_TOKEN_KEY).as_deref(), Some("abc"));

        reopened.clear().unwrap();
        let again = FileLocalStore::open(&path).unwrap();
        assert_eq!(again.get_item(THEME_KEY), None);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            FileLocalStore::open(&path),
            Err(LocalStoreError::Encoding(_))
        ));
    }
}
