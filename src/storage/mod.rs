//! Local persisted state

pub mod kv;
pub mod local_state;

pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use local_state::{
    CheckedMap, LocalState, CHECKED_INGREDIENTS_KEY, LIKED_RECIPES_KEY, USERNAME_KEY,
};
