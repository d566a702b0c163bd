//! Key-value persistence
//!
//! Everything the game keeps between sessions is a JSON string under a fixed
//! key: settings, the local high score table, player-services state and the
//! in-progress run. On the web the store is LocalStorage; natively and in
//! tests it is an in-memory map.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::sim::GameState;

/// Key for the suspended run
pub const SAVE_KEY: &str = "slyme_save";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Minimal string store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

/// LocalStorage when the browser allows it, otherwise an in-memory store
#[cfg(target_arch = "wasm32")]
pub fn open_browser_store() -> Box<dyn KeyValueStore> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            log::warn!("{}; progress will not be kept", e);
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn js_err(err: wasm_bindgen::JsValue) -> StoreError {
    StoreError::Backend(format!("{:?}", err))
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }
}

/// Read and decode a JSON value. Missing keys give `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(store: &mut dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

/// Suspend the current run
pub fn save_game(store: &mut dyn KeyValueStore, state: &GameState) -> Result<()> {
    save_json(store, SAVE_KEY, state)?;
    log::info!(
        "Game saved (score {}, length {})",
        state.score,
        state.len()
    );
    Ok(())
}

/// Load a suspended run. A corrupt snapshot is dropped.
pub fn load_game(store: &mut dyn KeyValueStore) -> Option<GameState> {
    match load_json::<GameState>(store, SAVE_KEY) {
        Ok(Some(state)) => match state.validate() {
            Ok(()) => Some(state),
            Err(e) => {
                log::warn!("Saved game is not playable ({}), discarding", e);
                clear_saved_game(store);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to load saved game: {}", e);
            clear_saved_game(store);
            None
        }
    }
}

/// Forget the suspended run
pub fn clear_saved_game(store: &mut dyn KeyValueStore) {
    match store.remove(SAVE_KEY) {
        Ok(()) => log::info!("Saved game cleared"),
        Err(e) => log::warn!("Failed to clear saved game: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GridSize, Rules};

    #[test]
    fn test_memory_store_basics() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_and_load_game() {
        let mut store = MemoryStore::new();
        let mut state = GameState::new(8, GridSize::new(10, 10), Rules::default());
        state.score = 70;
        save_game(&mut store, &state).unwrap();

        let loaded = load_game(&mut store).unwrap();
        assert_eq!(loaded.score, 70);
        assert_eq!(loaded.snake, state.snake);
        assert_eq!(loaded.food, state.food);
    }

    #[test]
    fn test_corrupt_save_is_discarded() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{not json").unwrap();
        assert!(load_game(&mut store).is_none());
        assert_eq!(store.get(SAVE_KEY).unwrap(), None);
    }

    /// Store a fresh save, edit its JSON, and check it is rejected and dropped
    fn assert_edited_save_discarded(edit: impl FnOnce(&mut serde_json::Value)) {
        let mut store = MemoryStore::new();
        let state = GameState::new(8, GridSize::new(10, 10), Rules::default());
        let mut json = serde_json::to_value(&state).unwrap();
        edit(&mut json);
        store.set(SAVE_KEY, &json.to_string()).unwrap();

        assert!(load_game(&mut store).is_none());
        assert_eq!(store.get(SAVE_KEY).unwrap(), None);
    }

    #[test]
    fn test_save_with_bad_rules_is_discarded() {
        assert_edited_save_discarded(|json| json["rules"]["foods_per_level"] = 0.into());
    }

    #[test]
    fn test_save_with_empty_snake_is_discarded() {
        assert_edited_save_discarded(|json| json["snake"] = serde_json::json!([]));
    }

    #[test]
    fn test_save_with_zero_width_board_is_discarded() {
        assert_edited_save_discarded(|json| json["grid"]["width"] = 0.into());
    }

    #[test]
    fn test_save_with_off_board_food_is_discarded() {
        assert_edited_save_discarded(|json| {
            json["food"] = serde_json::json!({ "col": 40, "row": 2 })
        });
    }

    #[test]
    fn test_clear_saved_game() {
        let mut store = MemoryStore::new();
        let state = GameState::new(8, GridSize::new(10, 10), Rules::default());
        save_game(&mut store, &state).unwrap();
        clear_saved_game(&mut store);
        assert!(load_game(&mut store).is_none());
    }

    #[test]
    fn test_load_json_missing_key() {
        let store = MemoryStore::new();
        let value: Option<Vec<u32>> = load_json(&store, "nothing").unwrap();
        assert!(value.is_none());
    }
}
