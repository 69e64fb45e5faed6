use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key holding the expanded module id. The name predates the expand/select split and is
/// kept for compatibility with state already persisted by the web frontend.
pub const EXPANDED_MODULE_KEY: &str = "selectedModuleId";
pub const SELECTED_SUBMODULE_KEY: &str = "selectedSubmoduleId";
/// Fallback administrator identity for sessions that lack a user.
pub const ADMIN_ID_KEY: &str = "id_admin";

/// KeyValueStore
///
/// String-to-string storage that survives a reload of the dashboard.
/// Reads and writes are synchronous and infallible from the caller's point of view.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
    /// Drops every key, not just the navigation ones.
    fn clear(&mut self);
}

/// MemoryStore
///
/// Process-local store. A clone taken before dropping a dashboard stands in for
/// "the browser kept its storage across a reload".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// FileStore
///
/// A JSON object on disk, rewritten after every mutation. Used by the `dashboard` CLI so
/// navigation state survives between invocations.
///
/// An unreadable or malformed file starts an empty store; failed writes are logged and
/// otherwise ignored.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("ignoring malformed state file {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let result = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(e) = result {
            tracing::warn!("could not persist state to {}: {}", self.path.display(), e);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.flush();
    }
}
