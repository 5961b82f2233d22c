//! Local key-value stores.
//!
//! The browser build persists into `window.localStorage`; the native build
//! into a JSON file under the user's data directory. Tests use the shared
//! in-memory store, which can be told to fail like a full browser quota.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::StorageError;

/// A synchronous string key-value store. Writes may fail (e.g. quota exceeded).
pub trait LocalStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    /// Maximum total size of keys and values, in bytes
    quota: Option<usize>,
    /// Reject every write as if the quota were exhausted
    failing: bool,
    writes: HashMap<String, usize>,
}

impl MemoryInner {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }
}

/// In-memory store. Clones share the same underlying map, so a handle kept
/// outside the save coordinator observes every write it makes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    /// Create an empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of keys and values.
    pub fn with_quota(self, bytes: usize) -> Self {
        self.inner.borrow_mut().quota = Some(bytes);
        self
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.inner.borrow_mut().failing = failing;
    }

    /// Number of successful writes to `key`.
    pub fn write_count(&self, key: &str) -> usize {
        self.inner.borrow().writes.get(key).copied().unwrap_or(0)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.borrow().entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        let over_quota = inner
            .quota
            .is_some_and(|quota| inner.used_bytes_with(key, value) > quota);
        if inner.failing || over_quota {
            return Err(StorageError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        inner.entries.insert(key.to_string(), value.to_string());
        *inner.writes.entry(key.to_string()).or_default() += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON file (native builds).
///
/// The whole map is rewritten on every change, which is fine for the handful
/// of keys the application uses.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
    entries: HashMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<std::path::PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            log::debug!("No storage file at {:?}, starting empty", path);
            HashMap::new()
        };
        Ok(Self { path, entries })
    }

    /// Default storage location under the user's data directory.
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::data_dir().map(|dir| dir.join("jadescroll").join("storage.json"))
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush() {
            // Keep memory and disk in agreement.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// `window.localStorage` (WASM only).
#[cfg(target_arch = "wasm32")]
pub struct BrowserStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    /// Resolve the page's local storage.
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage access error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl LocalStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("Failed to read '{}': {:?}", key, e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // The only way setItem throws in practice is QuotaExceededError.
        self.storage.set_item(key, value).map_err(|e| {
            log::debug!("localStorage.setItem('{}') threw {:?}", key, e);
            StorageError::QuotaExceeded {
                key: key.to_string(),
            }
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("Failed to remove '{}': {:?}", key, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shares_between_clones() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        store.set("a", "1").unwrap();
        assert_eq!(handle.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(handle.write_count("a"), 1);
        store.remove("a").unwrap();
        assert!(!handle.contains("a"));
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::new().with_quota(10);
        store.set("k", "12345").unwrap();
        // Replacing a value only counts the new size.
        store.set("k", "123456789").unwrap();
        let err = store.set("k2", "x").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { key } if key == "k2"));
        assert_eq!(store.write_count("k2"), 0);
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let mut store = MemoryStore::new();
        store.set_failing(true);
        assert!(store.set("a", "1").is_err());
        store.set_failing(false);
        assert!(store.set("a", "1").is_ok());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_persists_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "jadescroll-store-test-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set("lastSavedContent", "Hello").unwrap();
        drop(store);

        let mut reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("lastSavedContent").unwrap().as_deref(),
            Some("Hello")
        );
        reopened.remove("lastSavedContent").unwrap();
        assert_eq!(reopened.get("lastSavedContent").unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }
}
