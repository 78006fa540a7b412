//! In-memory session storage guarded by a mutex.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use aula_core::error::AppError;
use aula_core::result::AppResult;
use aula_core::traits::SessionStorage;

/// Process-local storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    /// Protected key/value map.
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::storage("Session storage lock poisoned"))
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> AppResult<()> {
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> AppResult<()> {
        let mut map = self.lock()?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
