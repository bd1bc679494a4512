use std::sync::{Arc, Mutex};

use super::*;

/// Store whose contents stay visible to the test after being boxed.
#[derive(Clone, Default)]
struct SharedStore {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl SharedStore {
    fn with(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.items.lock().unwrap().insert(key.to_owned(), value.to_owned());
        store
    }

    fn saved(&self) -> Option<Vec<String>> {
        let items = self.items.lock().unwrap();
        items
            .get(COLOR_HISTORY_KEY)
            .map(|raw| serde_json::from_str(raw).unwrap())
    }
}

impl KeyValueStore for SharedStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.items.lock().unwrap().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&mut self, _key: &str, _value: &str) -> io::Result<()> {
        Err(io::Error::other("quota exceeded"))
    }
}

// =============================================================================
// load
// =============================================================================

#[test]
fn load_from_empty_store_is_empty() {
    let history = ColorHistory::in_memory();
    assert!(history.entries().is_empty());
    assert_eq!(history.slots(), [None; HISTORY_CAPACITY]);
}

#[test]
fn load_filters_non_strings_and_truncates() {
    let store = SharedStore::with(
        COLOR_HISTORY_KEY,
        r##"["#111111", 7, null, "#222222", "#333333", "#444444", "#555555", "#666666"]"##,
    );
    let history = ColorHistory::load(Box::new(store));
    assert_eq!(history.entries(), ["#111111", "#222222", "#333333", "#444444", "#555555"]);
}

#[test]
fn load_drops_duplicates() {
    let store = SharedStore::with(COLOR_HISTORY_KEY, r##"["#111111", "#111111", "#222222"]"##);
    let history = ColorHistory::load(Box::new(store));
    assert_eq!(history.entries(), ["#111111", "#222222"]);
}

#[test]
fn load_ignores_garbage() {
    let store = SharedStore::with(COLOR_HISTORY_KEY, "{not json");
    assert!(ColorHistory::load(Box::new(store)).entries().is_empty());
    let store = SharedStore::with(COLOR_HISTORY_KEY, r#"{"a":1}"#);
    assert!(ColorHistory::load(Box::new(store)).entries().is_empty());
}

// =============================================================================
// register
// =============================================================================

#[test]
fn register_inserts_at_front_and_persists() {
    let store = SharedStore::default();
    let mut history = ColorHistory::load(Box::new(store.clone()));

    assert!(history.register("#ff0000"));
    assert!(history.register("#00ff00"));

    assert_eq!(history.entries(), ["#00ff00", "#ff0000"]);
    assert_eq!(store.saved().unwrap(), vec!["#00ff00", "#ff0000"]);
}

#[test]
fn register_most_recent_is_a_no_op() {
    let store = SharedStore::default();
    let mut history = ColorHistory::load(Box::new(store.clone()));
    history.register("#ff0000");
    store.items.lock().unwrap().clear();

    assert!(!history.register("#ff0000"));
    assert!(store.saved().is_none(), "no write when nothing changed");
}

#[test]
fn register_moves_existing_entry_to_front() {
    let mut history = ColorHistory::in_memory();
    for color in ["#000001", "#000002", "#000003"] {
        history.register(color);
    }
    assert!(history.register("#000001"));
    assert_eq!(history.entries(), ["#000001", "#000003", "#000002"]);
}

#[test]
fn register_evicts_oldest_beyond_capacity() {
    let mut history = ColorHistory::in_memory();
    for i in 0..8 {
        history.register(&format!("#00000{i}"));
    }
    assert_eq!(history.entries().len(), HISTORY_CAPACITY);
    assert_eq!(history.most_recent(), Some("#000007"));
    assert!(!history.entries().iter().any(|c| c == "#000002"));
}

#[test]
fn history_never_holds_duplicates_or_exceeds_capacity() {
    let mut history = ColorHistory::in_memory();
    let sequence = ["#a", "#b", "#a", "#c", "#d", "#b", "#e", "#f", "#a", "#a", "#g"];
    for color in sequence {
        history.register(color);
        let entries = history.entries();
        assert!(entries.len() <= HISTORY_CAPACITY);
        for (i, c) in entries.iter().enumerate() {
            assert!(!entries[i + 1..].contains(c), "duplicate {c} in {entries:?}");
        }
    }
}

#[test]
fn register_uses_exact_string_equality() {
    let mut history = ColorHistory::in_memory();
    history.register("#ffffff");
    history.register("#FFFFFF");
    assert_eq!(history.entries(), ["#FFFFFF", "#ffffff"]);
}

#[test]
fn write_failure_does_not_block_register() {
    let mut history = ColorHistory::load(Box::new(BrokenStore));
    assert!(history.register("#123456"));
    assert_eq!(history.most_recent(), Some("#123456"));
}

#[test]
fn slots_pad_with_none() {
    let mut history = ColorHistory::in_memory();
    history.register("#111111");
    history.register("#222222");
    assert_eq!(history.slots(), [Some("#222222"), Some("#111111"), None, None, None]);
}

// =============================================================================
// FileStore
// =============================================================================

#[test]
fn file_store_round_trips_through_disk() {
    let dir = std::env::temp_dir().join(format!("tinydots-history-{}", std::process::id()));
    let mut store = FileStore::new(&dir);
    assert!(store.get_item(COLOR_HISTORY_KEY).is_none());

    store.set_item(COLOR_HISTORY_KEY, r##"["#abcdef"]"##).unwrap();
    let history = ColorHistory::load(Box::new(FileStore::new(&dir)));
    assert_eq!(history.entries(), ["#abcdef"]);

    let _ = fs::remove_dir_all(&dir);
}
