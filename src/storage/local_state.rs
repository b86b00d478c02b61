//! Username, liked recipes and checked ingredients
//!
//! Each record lives under its own key as a JSON string. Updates are applied
//! as read → mutate → write while holding a lock for that key, so two toggles
//! on the same record cannot overwrite each other.

use super::kv::KeyValueStore;
use crate::Result;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

pub const USERNAME_KEY: &str = "username";
pub const LIKED_RECIPES_KEY: &str = "likedRecipes";
pub const CHECKED_INGREDIENTS_KEY: &str = "checkedIngredients";

/// recipe id → checked ingredient indices, in the order they were checked
pub type CheckedMap = BTreeMap<String, Vec<usize>>;

#[derive(Clone)]
pub struct LocalState {
    store: Arc<dyn KeyValueStore>,
    key_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl LocalState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.key_locks.lock();
        Arc::clone(locks.entry(key.to_string()).or_default())
    }

    /// Read a JSON record, falling back to the default when absent or corrupt
    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.store.get(key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable {} record: {}", key, e);
                T::default()
            }),
            Ok(None) => T::default(),
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                T::default()
            }
        }
    }

    /// Apply `f` to the record under `key` and persist the full result.
    ///
    /// Updates to the same key are serialized; different keys proceed
    /// independently.
    pub fn update<T, R, F>(&self, key: &str, f: F) -> Result<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> R,
    {
        let lock = self.key_lock(key);
        let _guard = lock.lock();

        let mut value: T = self.read(key);
        let out = f(&mut value);
        self.store.set(key, serde_json::to_string(&value)?)?;
        Ok(out)
    }

    pub fn username(&self) -> Option<String> {
        match self.store.get(USERNAME_KEY) {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                warn!("Failed to read username: {}", e);
                None
            }
        }
    }

    /// Store the username; returns false for blank input
    pub fn set_username(&self, name: &str) -> Result<bool> {
        if name.trim().is_empty() {
            return Ok(false);
        }
        self.store.set(USERNAME_KEY, name.trim().to_string())?;
        debug!("Username saved");
        Ok(true)
    }

    pub fn clear_username(&self) -> Result<()> {
        self.store.remove(USERNAME_KEY)
    }

    pub fn liked_ids(&self) -> Vec<String> {
        self.read(LIKED_RECIPES_KEY)
    }

    pub fn is_liked(&self, recipe_id: &str) -> bool {
        self.liked_ids().iter().any(|id| id == recipe_id)
    }

    /// Flip the liked flag for `recipe_id`; returns the new flag
    pub fn toggle_liked(&self, recipe_id: &str) -> Result<bool> {
        let liked = self.update(LIKED_RECIPES_KEY, |ids: &mut Vec<String>| {
            if let Some(pos) = ids.iter().position(|id| id == recipe_id) {
                ids.remove(pos);
                false
            } else {
                ids.push(recipe_id.to_string());
                true
            }
        })?;
        debug!("Recipe {} liked: {}", recipe_id, liked);
        Ok(liked)
    }

    pub fn checked_map(&self) -> CheckedMap {
        self.read(CHECKED_INGREDIENTS_KEY)
    }

    pub fn checked_indices(&self, recipe_id: &str) -> BTreeSet<usize> {
        self.checked_map()
            .remove(recipe_id)
            .map(|v| v.into_iter().collect())
            .unwrap_or_default()
    }

    /// Flip the checked flag of one ingredient row; returns the new flag.
    ///
    /// The recipe's entry is removed once its last index is unchecked.
    pub fn toggle_checked(&self, recipe_id: &str, index: usize) -> Result<bool> {
        self.update(CHECKED_INGREDIENTS_KEY, |map: &mut CheckedMap| {
            let indices = map.entry(recipe_id.to_string()).or_default();
            let checked = if let Some(pos) = indices.iter().position(|&i| i == index) {
                indices.remove(pos);
                false
            } else {
                indices.push(index);
                true
            };
            if indices.is_empty() {
                map.remove(recipe_id);
            }
            checked
        })
    }
}
