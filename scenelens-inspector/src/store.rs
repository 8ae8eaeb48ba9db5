/**
 * SESSION STORE - durable key/value persistence for named sessions
 *
 * LAYOUT (one string value per key):
 * - `layout-editor-sessions`          JSON array of session names
 * - `layout-editor-session-<name>`    JSON `{ changes, savedAt? }`
 * - `layout-editor-current-session`   active session name
 * - `layout-editor-autosave`          "true" | "false"
 *
 * Live originals are never written here. Keys left by older layouts that
 * persisted them are removed when the store is opened.
 */

use crate::reconcile::SessionChanges;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};

pub const SESSIONS_KEY: &str = "layout-editor-sessions";
pub const CURRENT_SESSION_KEY: &str = "layout-editor-current-session";
pub const AUTOSAVE_KEY: &str = "layout-editor-autosave";
pub const SESSION_KEY_PREFIX: &str = "layout-editor-session-";
pub const LEGACY_KEYS: [&str; 3] = ["layout-editor-changes", "layout-editor-originals", "layout-editor-transforms"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key/value storage, local to the process.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Key/value map persisted as one pretty-printed JSON object, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            entries: BTreeMap::new(),
        };
        store.load_from_disk()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, "{}")?;
            info!("[store] created empty storage file {}", self.path.display());
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<BTreeMap<String, String>>(&content) {
            Ok(entries) => {
                self.entries = entries;
                info!("[store] loaded {} keys from {}", self.entries.len(), self.path.display());
            }
            // Unreadable storage is treated as empty, it will be rewritten on the next change.
            Err(e) => warn!("[store] ignoring corrupt storage file {}: {e}", self.path.display()),
        }
        Ok(())
    }

    fn save_to_disk(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.save_to_disk()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.save_to_disk()?;
        }
        Ok(())
    }
}

/// Stored form of one named session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub changes: SessionChanges,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub saved_at: Option<OffsetDateTime>,
}

pub fn session_key(name: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{name}")
}

/// Typed view over a `KeyValueStore`.
#[derive(Debug)]
pub struct SessionStore<S> {
    kv: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Wraps `kv` and drops keys written by superseded storage layouts.
    pub fn open(mut kv: S) -> Self {
        for key in LEGACY_KEYS {
            if kv.get(key).is_some() {
                match kv.remove(key) {
                    Ok(()) => info!("[store] removed legacy key {key}"),
                    Err(e) => warn!("[store] failed to remove legacy key {key}: {e}"),
                }
            }
        }
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Parsed value at `key`; missing or unparsable data reads as `None`.
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.kv.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("[store] corrupt value at {key}: {e}");
                None
            }
        }
    }

    pub fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, raw)
    }

    pub fn session_names(&self) -> Vec<String> {
        self.read_json(SESSIONS_KEY).unwrap_or_default()
    }

    pub fn read_session(&self, name: &str) -> Option<SessionRecord> {
        self.read_json(&session_key(name))
    }

    /// Writes the record and appends `name` to the index if it is new.
    pub fn write_session(&mut self, name: &str, record: &SessionRecord) -> Result<(), StoreError> {
        self.write_json(&session_key(name), record)?;
        let mut names = self.session_names();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
            self.write_json(SESSIONS_KEY, &names)?;
        }
        Ok(())
    }

    /// Removes the record and its index entry. Clears the active name if it pointed here.
    pub fn delete_session(&mut self, name: &str) -> Result<(), StoreError> {
        self.kv.remove(&session_key(name))?;
        let names: Vec<String> = self.session_names().into_iter().filter(|n| n != name).collect();
        self.write_json(SESSIONS_KEY, &names)?;
        if self.active_session().as_deref() == Some(name) {
            self.clear_active_session()?;
        }
        Ok(())
    }

    pub fn active_session(&self) -> Option<String> {
        self.kv.get(CURRENT_SESSION_KEY).filter(|name| !name.is_empty())
    }

    pub fn set_active_session(&mut self, name: &str) -> Result<(), StoreError> {
        self.kv.set(CURRENT_SESSION_KEY, name.to_string())
    }

    pub fn clear_active_session(&mut self) -> Result<(), StoreError> {
        self.kv.remove(CURRENT_SESSION_KEY)
    }

    /// `None` when the preference was never stored.
    pub fn autosave(&self) -> Option<bool> {
        self.kv.get(AUTOSAVE_KEY).map(|v| v == "true")
    }

    pub fn set_autosave(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.kv.set(AUTOSAVE_KEY, enabled.to_string())
    }
}
