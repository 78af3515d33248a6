use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;

use super::StateStore;

/// An in-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map; no write is ever left half-done.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[rocket::async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rocket::async_test]
    async fn clones_share_entries() {
        let store = MemoryStore::default();
        let other = store.clone();
        assert!(store.is_empty());

        store.set("phase", "VOTING".into()).await.unwrap();
        assert_eq!(other.get("phase").await.unwrap().as_deref(), Some("VOTING"));
        assert_eq!(other.len(), 1);

        other.remove("phase").await.unwrap();
        assert_eq!(store.get("phase").await.unwrap(), None);
        // Removing again is fine.
        store.remove("phase").await.unwrap();
    }
}
