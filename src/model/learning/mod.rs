use std::sync::Arc;

use rocket::tokio::sync::Mutex;

pub use controller::LearningController;
pub use level::{
    CompetencyLevel, DiscussionMessage, LearningMaterial, LevelSpec, MaterialKind, MaterialSpec,
    MessageKind, MessageSpec, ModuleContent, UserRole,
};
pub use question::{Answer, Answers, MatchingPair, QuestionKind, QuizQuestion, QuizScore};
pub use quiz::{Quiz, QuizAction, QuizDraft, QuizStatus, EXPIRY_GRACE_MINUTES};

mod controller;
mod level;
mod question;
mod quiz;

/// Learning content as held in managed state, shared with the expiry sweep.
pub type SharedLearning = Arc<Mutex<LearningController>>;
