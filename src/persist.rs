//! Persistence adapter: snapshots of state, names, and preferences in a
//! key-value store.
//!
//! The store is a small string-to-string map behind the [`KeyValueStore`]
//! trait; the default backend is a single JSON file ([`FileStore`]). Each
//! concern lives under its own key so a corrupt value only loses that one
//! concern:
//!
//! | key              | value                                        |
//! |------------------|----------------------------------------------|
//! | `tierListData`   | JSON object of the six buckets               |
//! | `tierNames`      | JSON object `{"S": ..., ..., "D": ...}`      |
//! | `isStreamerMode` | JSON bool                                    |
//! | `tableWidth`     | JSON number                                  |
//! | `theme`          | bare kebab-case string, no JSON quoting      |
//!
//! Loads are tolerant: a missing or unparseable value falls back to that
//! concern's default instead of failing the whole load. Saves handle a full
//! store by clearing it and retrying the entire snapshot exactly once; a
//! second failure surfaces as [`PersistError::Quota`].

use crate::store::{TierNames, TierState};
use crate::theme::ThemePref;
use serde::Deserialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const KEY_TIER_DATA: &str = "tierListData";
pub const KEY_TIER_NAMES: &str = "tierNames";
pub const KEY_STREAMER_MODE: &str = "isStreamerMode";
pub const KEY_TABLE_WIDTH: &str = "tableWidth";
pub const KEY_THEME: &str = "theme";

/// Working-surface width bounds, in logical pixels.
pub const TABLE_WIDTH_DEFAULT: u32 = 1152;
pub const TABLE_WIDTH_MIN: u32 = 400;
pub const TABLE_WIDTH_MAX: u32 = 3840;

/// A write was rejected because the backing store is out of room.
#[derive(Error, Debug)]
#[error("storage is full")]
pub struct StorageFull;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("storage is full even after clearing saved data")]
    Quota,
    #[error("failed to serialize saved data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The persistence seam: a flat string-keyed store.
///
/// `set` is the only fallible operation; it models the quota-style failure
/// of a bounded store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageFull>;
    fn remove(&mut self, key: &str);
    fn clear(&mut self);
}

/// Display preferences saved alongside the list itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub streamer_mode: bool,
    /// Clamped to [`TABLE_WIDTH_MIN`]..=[`TABLE_WIDTH_MAX`] on load and set.
    pub table_width: u32,
    pub theme: ThemePref,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            streamer_mode: false,
            table_width: TABLE_WIDTH_DEFAULT,
            theme: ThemePref::default(),
        }
    }
}

impl Preferences {
    pub fn set_table_width(&mut self, width: u32) {
        self.table_width = width.clamp(TABLE_WIDTH_MIN, TABLE_WIDTH_MAX);
    }
}

/// Load the ranked state. Missing or corrupt data yields an empty list.
pub fn load_state(store: &impl KeyValueStore) -> TierState {
    load_json(store, KEY_TIER_DATA)
}

/// Load the tier display names, defaulting to S/A/B/C/D.
pub fn load_names(store: &impl KeyValueStore) -> TierNames {
    load_json(store, KEY_TIER_NAMES)
}

/// Load preferences, each key independently tolerant.
pub fn load_preferences(store: &impl KeyValueStore) -> Preferences {
    let mut prefs = Preferences {
        streamer_mode: load_json(store, KEY_STREAMER_MODE),
        table_width: load_json_or(store, KEY_TABLE_WIDTH, TABLE_WIDTH_DEFAULT),
        theme: store
            .get(KEY_THEME)
            .and_then(|raw| theme_from_str(&raw))
            .unwrap_or_default(),
    };
    prefs.set_table_width(prefs.table_width);
    prefs
}

/// Write the full snapshot.
///
/// If any write hits a full store, the store is cleared and the whole
/// snapshot is written again from scratch; only a second failure is an
/// error. Clearing is safe because every key this module owns is part of
/// the snapshot being written.
pub fn save_all(
    store: &mut impl KeyValueStore,
    state: &TierState,
    names: &TierNames,
    prefs: &Preferences,
) -> Result<(), PersistError> {
    let entries = [
        (KEY_TIER_DATA, serde_json::to_string(state)?),
        (KEY_TIER_NAMES, serde_json::to_string(names)?),
        (KEY_STREAMER_MODE, serde_json::to_string(&prefs.streamer_mode)?),
        (KEY_TABLE_WIDTH, serde_json::to_string(&prefs.table_width)?),
        (KEY_THEME, theme_to_string(prefs.theme)),
    ];

    if write_entries(store, &entries).is_ok() {
        return Ok(());
    }
    store.clear();
    write_entries(store, &entries).map_err(|_| PersistError::Quota)
}

fn write_entries(
    store: &mut impl KeyValueStore,
    entries: &[(&str, String)],
) -> Result<(), StorageFull> {
    for (key, value) in entries {
        store.set(key, value)?;
    }
    Ok(())
}

fn load_json<T: for<'de> Deserialize<'de> + Default>(store: &impl KeyValueStore, key: &str) -> T {
    load_json_or(store, key, T::default())
}

fn load_json_or<T: for<'de> Deserialize<'de>>(
    store: &impl KeyValueStore,
    key: &str,
    fallback: T,
) -> T {
    store
        .get(key)
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or(fallback)
}

/// The theme key holds the bare kebab-case variant, not a JSON string.
fn theme_from_str(raw: &str) -> Option<ThemePref> {
    serde_json::from_value(serde_json::Value::String(raw.to_string())).ok()
}

fn theme_to_string(theme: ThemePref) -> String {
    match serde_json::to_value(theme) {
        Ok(serde_json::Value::String(s)) => s,
        _ => "system".to_string(),
    }
}

/// [`KeyValueStore`] backed by one JSON object file.
///
/// Opening never fails: a missing or unreadable file starts empty, same as
/// a fresh browser profile would. Writes flush the whole map; an I/O error
/// on flush is reported as a full store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: HashMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = std::fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { path, map }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.map)?;
        std::fs::write(&self.path, json)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageFull> {
        self.map.insert(key.to_string(), value.to_string());
        self.flush().map_err(|_| StorageFull)
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
        let _ = self.flush();
    }

    fn clear(&mut self) {
        self.map.clear();
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Bucket, Item, Tier};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // =========================================================================
    // Mock store
    // =========================================================================

    /// What the persistence layer asked the store to do.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum RecordedOp {
        Set(String),
        Clear,
    }

    /// In-memory store that can be told to reject the next N writes, with an
    /// op log shared with the test.
    struct MockStore {
        map: HashMap<String, String>,
        reject_next: usize,
        ops: Arc<Mutex<Vec<RecordedOp>>>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                map: HashMap::new(),
                reject_next: 0,
                ops: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn rejecting(n: usize) -> Self {
            let mut store = Self::new();
            store.reject_next = n;
            store
        }
    }

    impl KeyValueStore for MockStore {
        fn get(&self, key: &str) -> Option<String> {
            self.map.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageFull> {
            self.ops.lock().unwrap().push(RecordedOp::Set(key.into()));
            if self.reject_next > 0 {
                self.reject_next -= 1;
                return Err(StorageFull);
            }
            self.map.insert(key.into(), value.into());
            Ok(())
        }

        fn remove(&mut self, key: &str) {
            self.map.remove(key);
        }

        fn clear(&mut self) {
            self.ops.lock().unwrap().push(RecordedOp::Clear);
            self.map.clear();
        }
    }

    fn sample_state() -> TierState {
        let mut st = TierState::new();
        st.append_item(
            Item {
                id: "one".into(),
                src: "data:image/jpeg;base64,AA==".into(),
                name: "one.png".into(),
            },
            Bucket::S,
        );
        st.append_item(
            Item {
                id: "two".into(),
                src: "data:image/jpeg;base64,BB==".into(),
                name: "two.png".into(),
            },
            Bucket::Unranked,
        );
        st
    }

    // =========================================================================
    // Snapshot round trip
    // =========================================================================

    #[test]
    fn snapshot_round_trips_through_a_store() {
        let mut store = MockStore::new();
        let state = sample_state();
        let mut names = TierNames::default();
        names.set(Tier::S, "Goated");
        let prefs = Preferences {
            streamer_mode: true,
            table_width: 800,
            theme: ThemePref::RetroArcade,
        };

        save_all(&mut store, &state, &names, &prefs).unwrap();

        assert_eq!(load_state(&store), state);
        assert_eq!(load_names(&store), names);
        assert_eq!(load_preferences(&store), prefs);
    }

    #[test]
    fn theme_is_stored_as_a_bare_string() {
        let mut store = MockStore::new();
        let prefs = Preferences {
            theme: ThemePref::RetroArcade,
            ..Preferences::default()
        };
        save_all(&mut store, &TierState::new(), &TierNames::default(), &prefs).unwrap();

        // No JSON quoting on this key
        assert_eq!(store.get(KEY_THEME).as_deref(), Some("retro-arcade"));
    }

    #[test]
    fn booleans_and_numbers_are_json_encoded() {
        let mut store = MockStore::new();
        let prefs = Preferences {
            streamer_mode: true,
            table_width: 640,
            ..Preferences::default()
        };
        save_all(&mut store, &TierState::new(), &TierNames::default(), &prefs).unwrap();

        assert_eq!(store.get(KEY_STREAMER_MODE).as_deref(), Some("true"));
        assert_eq!(store.get(KEY_TABLE_WIDTH).as_deref(), Some("640"));
    }

    // =========================================================================
    // Tolerant loads
    // =========================================================================

    #[test]
    fn empty_store_loads_defaults() {
        let store = MockStore::new();
        assert!(load_state(&store).is_empty());
        assert_eq!(load_names(&store), TierNames::default());
        assert_eq!(load_preferences(&store), Preferences::default());
    }

    #[test]
    fn corrupt_value_only_loses_its_own_key() {
        let mut store = MockStore::new();
        let state = sample_state();
        save_all(
            &mut store,
            &state,
            &TierNames::default(),
            &Preferences::default(),
        )
        .unwrap();
        store.set(KEY_TIER_NAMES, "{not json").unwrap();
        store.set(KEY_THEME, "no-such-theme").unwrap();

        assert_eq!(load_state(&store), state); // unaffected
        assert_eq!(load_names(&store), TierNames::default());
        assert_eq!(load_preferences(&store).theme, ThemePref::System);
    }

    #[test]
    fn out_of_range_table_width_is_clamped_on_load() {
        let mut store = MockStore::new();
        store.set(KEY_TABLE_WIDTH, "120").unwrap();
        assert_eq!(load_preferences(&store).table_width, TABLE_WIDTH_MIN);

        store.set(KEY_TABLE_WIDTH, "99999").unwrap();
        assert_eq!(load_preferences(&store).table_width, TABLE_WIDTH_MAX);
    }

    #[test]
    fn set_table_width_clamps() {
        let mut prefs = Preferences::default();
        prefs.set_table_width(10);
        assert_eq!(prefs.table_width, TABLE_WIDTH_MIN);
        prefs.set_table_width(4000);
        assert_eq!(prefs.table_width, TABLE_WIDTH_MAX);
        prefs.set_table_width(1000);
        assert_eq!(prefs.table_width, 1000);
    }

    // =========================================================================
    // Full-store handling
    // =========================================================================

    #[test]
    fn full_store_clears_and_retries_once() {
        let mut store = MockStore::rejecting(1);
        let ops = Arc::clone(&store.ops);

        save_all(
            &mut store,
            &sample_state(),
            &TierNames::default(),
            &Preferences::default(),
        )
        .unwrap();

        // First set rejected, then a clear, then the full snapshot again
        let recorded = ops.lock().unwrap();
        assert_eq!(recorded[0], RecordedOp::Set(KEY_TIER_DATA.into()));
        assert_eq!(recorded[1], RecordedOp::Clear);
        assert_eq!(recorded.len(), 2 + 5);
        assert!(store.get(KEY_TIER_DATA).is_some());
    }

    #[test]
    fn persistently_full_store_reports_quota() {
        let mut store = MockStore::rejecting(100);
        let err = save_all(
            &mut store,
            &sample_state(),
            &TierNames::default(),
            &Preferences::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PersistError::Quota));
    }

    // =========================================================================
    // FileStore
    // =========================================================================

    #[test]
    fn file_store_round_trips_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.json");

        let mut store = FileStore::open(&path);
        let state = sample_state();
        save_all(
            &mut store,
            &state,
            &TierNames::default(),
            &Preferences::default(),
        )
        .unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(load_state(&reopened), state);
    }

    #[test]
    fn file_store_opens_empty_for_missing_or_corrupt_files() {
        let tmp = TempDir::new().unwrap();
        let missing = FileStore::open(tmp.path().join("nope.json"));
        assert!(missing.get(KEY_TIER_DATA).is_none());

        let corrupt_path = tmp.path().join("bad.json");
        std::fs::write(&corrupt_path, "]]]").unwrap();
        let corrupt = FileStore::open(&corrupt_path);
        assert!(corrupt.get(KEY_TIER_DATA).is_none());
    }

    #[test]
    fn file_store_remove_and_clear_persist() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("list.json");

        let mut store = FileStore::open(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a");
        assert!(FileStore::open(&path).get("a").is_none());
        assert_eq!(FileStore::open(&path).get("b").as_deref(), Some("2"));

        store.clear();
        assert!(FileStore::open(&path).get("b").is_none());
    }
}
