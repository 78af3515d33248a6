use serde::{Deserialize, Serialize};

use crate::model::generate_id;

use super::PositionId;

/// An office that candidates stand for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionPosition {
    pub id: PositionId,
    pub title: String,
    pub description: String,
    /// How many candidates a voter may pick for this position.
    pub max_votes: u32,
}

/// An administrator's request to create a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSpec {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub max_votes: Option<u32>,
}

impl ElectionPosition {
    /// Build a new position with a fresh ID.
    pub fn from_spec(spec: PositionSpec) -> Self {
        Self {
            id: generate_id("pos"),
            title: spec.title.trim().to_string(),
            description: spec
                .description
                .unwrap_or_else(|| "Custom Position".to_string()),
            max_votes: spec.max_votes.unwrap_or(1),
        }
    }
}

impl PositionSpec {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            max_votes: None,
        }
    }
}
