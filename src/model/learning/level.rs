use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::generate_id;

use super::Quiz;

/// The levels of one learning module, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleContent {
    pub module_id: String,
    #[serde(default)]
    pub levels: Vec<CompetencyLevel>,
}

/// A step within a module, gated by an optional quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyLevel {
    pub id: String,
    pub level_number: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub materials: Vec<LearningMaterial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    #[serde(default)]
    pub discussions: Vec<DiscussionMessage>,
    #[serde(default)]
    pub live_session_active: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaterialKind {
    #[serde(rename = "PDF")]
    Pdf,
    Video,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningMaterial {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Audio,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Admin,
    Staff,
    Student,
    Parent,
}

/// A post in a level's discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionMessage {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_role: UserRole,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

/// A new level for a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A new learning material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSpec {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    /// Only links may leave this out.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A new discussion post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSpec {
    pub user_id: String,
    pub user_name: String,
    pub user_role: UserRole,
    pub content: String,
    #[serde(rename = "type", default = "MessageSpec::default_kind")]
    pub kind: MessageKind,
}

impl ModuleContent {
    pub fn new(module_id: impl Into<String>) -> Self {
        Self {
            module_id: module_id.into(),
            levels: Vec::new(),
        }
    }

    pub fn level(&self, level_id: &str) -> Option<&CompetencyLevel> {
        self.levels.iter().find(|l| l.id == level_id)
    }

    pub fn level_mut(&mut self, level_id: &str) -> Option<&mut CompetencyLevel> {
        self.levels.iter_mut().find(|l| l.id == level_id)
    }

    /// Append a level numbered one past the current highest.
    pub fn push_level(&mut self, spec: LevelSpec) -> &CompetencyLevel {
        let level_number = self
            .levels
            .iter()
            .map(|l| l.level_number)
            .max()
            .unwrap_or(0)
            + 1;
        let level = CompetencyLevel::new(generate_id("lvl"), level_number, spec);
        self.levels.push(level);
        &self.levels[self.levels.len() - 1]
    }
}

impl CompetencyLevel {
    pub fn new(id: String, level_number: u32, spec: LevelSpec) -> Self {
        Self {
            id,
            level_number,
            title: spec.title,
            description: spec.description,
            materials: Vec::new(),
            quiz: None,
            discussions: Vec::new(),
            live_session_active: false,
        }
    }
}

impl LearningMaterial {
    /// Stands in for the address of a link added without one.
    pub const PLACEHOLDER_URL: &'static str = "#";

    pub fn from_spec(spec: MaterialSpec) -> Self {
        let url = if spec.url.trim().is_empty() {
            Self::PLACEHOLDER_URL.to_string()
        } else {
            spec.url
        };
        Self {
            id: generate_id("mat"),
            title: spec.title,
            kind: spec.kind,
            url,
            description: spec.description,
        }
    }
}

impl DiscussionMessage {
    pub fn from_spec(spec: MessageSpec, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: generate_id("msg"),
            user_id: spec.user_id,
            user_name: spec.user_name,
            user_role: spec.user_role,
            content: spec.content,
            kind: spec.kind,
            timestamp,
        }
    }
}

impl LevelSpec {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

impl MessageSpec {
    fn default_kind() -> MessageKind {
        MessageKind::Text
    }
}
