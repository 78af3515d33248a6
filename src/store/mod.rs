//! Key/value persistence for controller state.
//!
//! Every controller writes through a [`StateStore`] immediately after each
//! mutation. Keys are independent: there is no multi-key transaction.

use rocket::serde::json::serde_json;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

mod memory;
mod mongo;

pub const PHASE_KEY: &str = "baobab_election_phase";
pub const POSITIONS_KEY: &str = "baobab_election_positions";
pub const CANDIDATES_KEY: &str = "baobab_election_candidates";
pub const VOTERS_KEY: &str = "baobab_election_voters";
pub const HAS_VOTED_KEY: &str = "baobab_election_has_voted";
pub const LEARNING_CONTENT_KEY: &str = "baobab_learning_content";

/// A durable string-valued key/value store.
#[rocket::async_trait]
pub trait StateStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

impl dyn StateStore {
    /// Read and decode a JSON value.
    pub async fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encode and write a JSON value.
    pub async fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw).await
    }
}
