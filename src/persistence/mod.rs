//! Key-value persistence for settings and the best score
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, ephemeral sessions)
//! - `FileStore`: JSON file on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::collections::BTreeMap;

use crate::error::StoreError;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// String-keyed store that survives process restarts
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "skyflap-best-score";

/// Read the best score. Absent or unparsable values count as 0.
pub fn load_best_score(store: &dyn KeyValueStore) -> Result<u64, StoreError> {
    let best = store
        .get(BEST_SCORE_KEY)?
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    Ok(best)
}

/// Write the best score
pub fn save_best_score(store: &mut dyn KeyValueStore, score: u64) -> Result<(), StoreError> {
    store.set(BEST_SCORE_KEY, &score.to_string())
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
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
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
