use mongodb::{bson::doc, options::ReplaceOptions, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::StateStore;

/// One stored key, as a database document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StateEntry {
    #[serde(rename = "_id")]
    key: String,
    value: String,
}

impl StateEntry {
    const COLLECTION: &'static str = "state";
}

/// A store holding one document per key in the `state` collection.
#[derive(Debug, Clone)]
pub struct MongoStore {
    entries: Collection<StateEntry>,
}

impl MongoStore {
    /// Get a handle on the state collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self {
            entries: db.collection(StateEntry::COLLECTION),
        }
    }
}

#[rocket::async_trait]
impl StateStore for MongoStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = self.entries.find_one(doc! { "_id": key }, None).await?;
        Ok(entry.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let entry = StateEntry {
            key: key.to_string(),
            value,
        };
        let upsert = ReplaceOptions::builder().upsert(true).build();
        self.entries
            .replace_one(doc! { "_id": key }, &entry, upsert)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.delete_one(doc! { "_id": key }, None).await?;
        Ok(())
    }
}
