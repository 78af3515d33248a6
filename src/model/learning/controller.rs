use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::error::{Error, Result};
use crate::model::generate_id;
use crate::store::{StateStore, LEARNING_CONTENT_KEY};

use super::{
    Answers, CompetencyLevel, DiscussionMessage, LearningMaterial, LevelSpec, MaterialKind,
    MaterialSpec, MessageSpec, ModuleContent, Quiz, QuizDraft, QuizScore,
};

/// Learning content for every module, including each level's quiz.
///
/// Like the election, content is held in memory and the whole document is
/// written back to the store after each mutation.
pub struct LearningController {
    store: Arc<dyn StateStore>,
    content: Vec<ModuleContent>,
}

impl LearningController {
    pub async fn load(store: Arc<dyn StateStore>) -> Result<Self> {
        let content: Vec<ModuleContent> = store
            .load_json(LEARNING_CONTENT_KEY)
            .await?
            .unwrap_or_default();
        debug!("Loaded learning content for {} modules", content.len());
        Ok(Self { store, content })
    }

    /// Install starting content if there is none yet. Returns whether it did.
    pub async fn seed_content(&mut self, content: Vec<ModuleContent>) -> Result<bool> {
        if !self.content.is_empty() {
            return Ok(false);
        }
        self.content = content;
        self.save().await?;
        info!("Seeded learning content for {} modules", self.content.len());
        Ok(true)
    }

    pub fn content(&self) -> &[ModuleContent] {
        &self.content
    }

    pub fn module(&self, module_id: &str) -> Option<&ModuleContent> {
        self.content.iter().find(|m| m.module_id == module_id)
    }

    pub fn level(&self, module_id: &str, level_id: &str) -> Result<&CompetencyLevel> {
        self.module(module_id)
            .and_then(|m| m.level(level_id))
            .ok_or_else(|| level_not_found(module_id, level_id))
    }

    // Levels, materials and discussions.

    /// Append a level to a module, creating the module's content if needed.
    pub async fn add_level(&mut self, module_id: &str, spec: LevelSpec) -> Result<CompetencyLevel> {
        if spec.title.trim().is_empty() {
            return Err(Error::bad_request("Level title is required"));
        }
        let module = match self.content.iter().position(|m| m.module_id == module_id) {
            Some(index) => &mut self.content[index],
            None => {
                self.content.push(ModuleContent::new(module_id));
                let last = self.content.len() - 1;
                &mut self.content[last]
            }
        };
        let level = module.push_level(spec).clone();
        self.save().await?;
        info!("Added level {} to module {module_id}", level.id);
        Ok(level)
    }

    pub async fn add_material(
        &mut self,
        module_id: &str,
        level_id: &str,
        spec: MaterialSpec,
    ) -> Result<LearningMaterial> {
        if spec.title.trim().is_empty() {
            return Err(Error::bad_request("Material title is required"));
        }
        if spec.url.trim().is_empty() && spec.kind != MaterialKind::Link {
            return Err(Error::bad_request(format!("A {:?} material needs a URL", spec.kind)));
        }
        let level = self.level_mut(module_id, level_id)?;
        let material = LearningMaterial::from_spec(spec);
        level.materials.push(material.clone());
        self.save().await?;
        info!("Added material {} to level {level_id}", material.id);
        Ok(material)
    }

    pub async fn post_message(
        &mut self,
        module_id: &str,
        level_id: &str,
        spec: MessageSpec,
        now: DateTime<Utc>,
    ) -> Result<DiscussionMessage> {
        if spec.content.trim().is_empty() {
            return Err(Error::bad_request("Message content is required"));
        }
        let level = self.level_mut(module_id, level_id)?;
        let message = DiscussionMessage::from_spec(spec, now);
        level.discussions.push(message.clone());
        self.save().await?;
        debug!("{} posted in level {level_id}", message.user_id);
        Ok(message)
    }

    /// Open or close a level's live session. Returns the new state.
    pub async fn toggle_live_session(&mut self, module_id: &str, level_id: &str) -> Result<bool> {
        let level = self.level_mut(module_id, level_id)?;
        level.live_session_active = !level.live_session_active;
        let active = level.live_session_active;
        self.save().await?;
        info!(
            "Live session for level {level_id} {}",
            if active { "opened" } else { "closed" }
        );
        Ok(active)
    }

    // Quizzes.

    /// Create or replace a level's quiz. An existing quiz keeps its id and may
    /// only be replaced while it is not running or finished.
    pub async fn save_quiz(
        &mut self,
        module_id: &str,
        level_id: &str,
        draft: QuizDraft,
    ) -> Result<Quiz> {
        let level = self.level_mut(module_id, level_id)?;
        let id = match &level.quiz {
            Some(existing) => {
                existing.check_editable()?;
                existing.id.clone()
            }
            None => generate_id("quiz"),
        };
        let quiz = Quiz::from_draft(id, draft).map_err(Error::bad_request)?;
        level.quiz = Some(quiz.clone());
        self.save().await?;
        info!("Saved quiz {} ({}) as {}", quiz.id, quiz.title, quiz.status);
        Ok(quiz)
    }

    pub async fn delete_quiz(&mut self, module_id: &str, level_id: &str) -> Result<()> {
        let level = self.level_mut(module_id, level_id)?;
        let quiz = level.quiz.take().ok_or_else(|| quiz_not_found(level_id))?;
        self.save().await?;
        info!("Deleted quiz {} from level {level_id}", quiz.id);
        Ok(())
    }

    pub async fn launch_quiz(
        &mut self,
        module_id: &str,
        level_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Quiz> {
        let quiz = self.quiz_mut(module_id, level_id)?;
        quiz.launch(now)?;
        let quiz = quiz.clone();
        self.save().await?;
        info!("Launched quiz {} at {now}", quiz.id);
        Ok(quiz)
    }

    pub async fn end_quiz(&mut self, module_id: &str, level_id: &str) -> Result<Quiz> {
        let quiz = self.quiz_mut(module_id, level_id)?;
        quiz.end()?;
        let quiz = quiz.clone();
        self.save().await?;
        info!("Ended quiz {}", quiz.id);
        Ok(quiz)
    }

    pub async fn reset_quiz(&mut self, module_id: &str, level_id: &str) -> Result<Quiz> {
        let quiz = self.quiz_mut(module_id, level_id)?;
        quiz.reset_to_draft();
        let quiz = quiz.clone();
        self.save().await?;
        info!("Reset quiz {} to {}", quiz.id, quiz.status);
        Ok(quiz)
    }

    /// Grade a submission against the level's active quiz. Nothing is stored.
    pub fn submit_quiz(
        &self,
        module_id: &str,
        level_id: &str,
        answers: &Answers,
    ) -> Result<QuizScore> {
        let quiz = self
            .level(module_id, level_id)?
            .quiz
            .as_ref()
            .ok_or_else(|| quiz_not_found(level_id))?;
        Ok(quiz.grade(answers)?)
    }

    /// Complete every active quiz that has run past its duration and grace
    /// period. Returns the ids of the quizzes closed.
    pub async fn sweep_expired(&mut self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let mut expired = Vec::new();
        for quiz in self
            .content
            .iter_mut()
            .flat_map(|m| m.levels.iter_mut())
            .filter_map(|l| l.quiz.as_mut())
        {
            if quiz.is_expired(now) {
                quiz.end()?;
                expired.push(quiz.id.clone());
            }
        }
        if !expired.is_empty() {
            self.save().await?;
            info!("Closed expired quizzes: {}", expired.join(", "));
        }
        Ok(expired)
    }

    fn level_mut(&mut self, module_id: &str, level_id: &str) -> Result<&mut CompetencyLevel> {
        self.content
            .iter_mut()
            .find(|m| m.module_id == module_id)
            .and_then(|m| m.level_mut(level_id))
            .ok_or_else(|| level_not_found(module_id, level_id))
    }

    fn quiz_mut(&mut self, module_id: &str, level_id: &str) -> Result<&mut Quiz> {
        self.level_mut(module_id, level_id)?
            .quiz
            .as_mut()
            .ok_or_else(|| quiz_not_found(level_id))
    }

    async fn save(&self) -> Result<()> {
        self.store
            .save_json(LEARNING_CONTENT_KEY, &self.content)
            .await
    }
}

fn level_not_found(module_id: &str, level_id: &str) -> Error {
    Error::not_found(format!("Level '{level_id}' in module '{module_id}'"))
}

fn quiz_not_found(level_id: &str) -> Error {
    Error::not_found(format!("Quiz for level '{level_id}'"))
}
