use crate::persistence::{atomic_write, read_file};
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{trace, warn};

/// String-keyed durable storage shared by the task store and the filter state.
///
/// Handles are cheap to clone and every clone sees the same items, the way every
/// script on a page sees the same origin storage.
pub trait KeyValueStorage: Clone {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// All keys live in one JSON object file, rewritten atomically on every change
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_items(&self) -> Result<BTreeMap<String, String>> {
        let content = read_file(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(items) => Ok(items),
            Err(e) => {
                // Same recovery as an unreadable task list: start over empty
                warn!(path = %self.path.display(), error = %e, "storage file is not a JSON object, ignoring it");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_items(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(items).context("Failed to serialize storage")?;
        atomic_write(&self.path, &json)
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        trace!(key, bytes = value.len(), "set_item");
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        trace!(key, "remove_item");
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

/// In-process storage, used by tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
