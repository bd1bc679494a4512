//! Most-recently-used color history and its local key/value store.
//!
//! DESIGN
//! ======
//! The history is a front-loaded list capped at [`HISTORY_CAPACITY`].
//! Registering a color moves it to the front (or inserts it there) and
//! drops anything past the cap, then writes the list back to the store
//! under [`COLOR_HISTORY_KEY`]. Matching is exact string equality.
//!
//! The store stands in for browser local storage: a write failure is
//! logged and otherwise ignored so painting never stops on a full disk.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

use crate::consts::{COLOR_HISTORY_KEY, HISTORY_CAPACITY};

// =============================================================================
// KEY/VALUE STORE
// =============================================================================

/// Minimal string key/value persistence, shaped like `localStorage`.
pub trait KeyValueStore: Send {
    /// Read the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the value cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// Process-local store, used by tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("cannot read {key} from {}: {e}", self.dir.display());
                None
            }
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }
}

// =============================================================================
// COLOR HISTORY
// =============================================================================

/// Bounded most-recently-used color list backed by a [`KeyValueStore`].
pub struct ColorHistory {
    entries: Vec<String>,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for ColorHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorHistory")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ColorHistory {
    /// Seed the history from `store`.
    ///
    /// Anything that is not a JSON array of strings is treated as an empty
    /// history. Non-string entries and repeats are dropped, and the list is
    /// cut to capacity.
    #[must_use]
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let entries = store
            .get_item(COLOR_HISTORY_KEY)
            .and_then(|raw| match serde_json::from_str::<Value>(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    log::warn!("ignoring unreadable color history: {e}");
                    None
                }
            })
            .map(|value| parse_entries(&value))
            .unwrap_or_default();
        Self { entries, store }
    }

    /// Empty history with an in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    /// Fixed-width view with `None` placeholders for unused slots.
    #[must_use]
    pub fn slots(&self) -> [Option<&str>; HISTORY_CAPACITY] {
        let mut slots = [None; HISTORY_CAPACITY];
        for (slot, color) in slots.iter_mut().zip(&self.entries) {
            *slot = Some(color.as_str());
        }
        slots
    }

    /// Move `color` to the front. Returns `true` if the list changed.
    ///
    /// A color that is already most recent leaves the list untouched and
    /// skips the store write.
    pub fn register(&mut self, color: &str) -> bool {
        if self.most_recent() == Some(color) {
            return false;
        }
        if let Some(pos) = self.entries.iter().position(|c| c == color) {
            self.entries.remove(pos);
        }
        self.entries.insert(0, color.to_owned());
        self.entries.truncate(HISTORY_CAPACITY);
        self.persist();
        true
    }

    fn persist(&mut self) {
        let payload = match serde_json::to_string(&self.entries) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("color history encode failed: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set_item(COLOR_HISTORY_KEY, &payload) {
            log::warn!("color history write failed: {e}");
        }
    }
}

fn parse_entries(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    let mut entries: Vec<String> = Vec::with_capacity(HISTORY_CAPACITY);
    for color in items.iter().filter_map(Value::as_str) {
        if entries.len() == HISTORY_CAPACITY {
            break;
        }
        if !entries.iter().any(|c| c == color) {
            entries.push(color.to_owned());
        }
    }
    entries
}
