use std::sync::Arc;

use chrono::Utc;
use rocket::{serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::assistant::Assistant;
use crate::error::Result;
use crate::model::learning::{
    Answers, CompetencyLevel, DiscussionMessage, LearningMaterial, LevelSpec, MaterialSpec,
    MessageSpec, ModuleContent, Quiz, QuizDraft, QuizQuestion, QuizScore, SharedLearning,
};

pub fn routes() -> Vec<Route> {
    routes![
        content,
        add_level,
        save_quiz,
        delete_quiz,
        launch_quiz,
        end_quiz,
        reset_quiz,
        submit_quiz,
        add_material,
        post_message,
        toggle_live_session,
        generate_questions,
    ]
}

/// Default number of questions to generate.
const DEFAULT_QUESTION_COUNT: usize = 5;
/// Upper bound on questions per generation request.
const MAX_QUESTION_COUNT: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    topic: String,
    #[serde(default)]
    count: Option<usize>,
}

#[get("/learning")]
async fn content(learning: &State<SharedLearning>) -> Json<Vec<ModuleContent>> {
    Json(learning.lock().await.content().to_vec())
}

#[post("/learning/<module_id>/levels", data = "<spec>", format = "json")]
async fn add_level(
    module_id: &str,
    spec: Json<LevelSpec>,
    learning: &State<SharedLearning>,
) -> Result<Json<CompetencyLevel>> {
    Ok(Json(learning.lock().await.add_level(module_id, spec.0).await?))
}

#[put("/learning/<module_id>/<level_id>/quiz", data = "<draft>", format = "json")]
async fn save_quiz(
    module_id: &str,
    level_id: &str,
    draft: Json<QuizDraft>,
    learning: &State<SharedLearning>,
) -> Result<Json<Quiz>> {
    let mut learning = learning.lock().await;
    Ok(Json(learning.save_quiz(module_id, level_id, draft.0).await?))
}

#[delete("/learning/<module_id>/<level_id>/quiz")]
async fn delete_quiz(
    module_id: &str,
    level_id: &str,
    learning: &State<SharedLearning>,
) -> Result<()> {
    learning.lock().await.delete_quiz(module_id, level_id).await
}

#[post("/learning/<module_id>/<level_id>/quiz/launch")]
async fn launch_quiz(
    module_id: &str,
    level_id: &str,
    learning: &State<SharedLearning>,
) -> Result<Json<Quiz>> {
    let mut learning = learning.lock().await;
    Ok(Json(learning.launch_quiz(module_id, level_id, Utc::now()).await?))
}

#[post("/learning/<module_id>/<level_id>/quiz/end")]
async fn end_quiz(
    module_id: &str,
    level_id: &str,
    learning: &State<SharedLearning>,
) -> Result<Json<Quiz>> {
    Ok(Json(learning.lock().await.end_quiz(module_id, level_id).await?))
}

#[post("/learning/<module_id>/<level_id>/quiz/draft")]
async fn reset_quiz(
    module_id: &str,
    level_id: &str,
    learning: &State<SharedLearning>,
) -> Result<Json<Quiz>> {
    Ok(Json(learning.lock().await.reset_quiz(module_id, level_id).await?))
}

#[post("/learning/<module_id>/<level_id>/quiz/submit", data = "<answers>", format = "json")]
async fn submit_quiz(
    module_id: &str,
    level_id: &str,
    answers: Json<Answers>,
    learning: &State<SharedLearning>,
) -> Result<Json<QuizScore>> {
    let learning = learning.lock().await;
    Ok(Json(learning.submit_quiz(module_id, level_id, &answers)?))
}

#[post("/learning/<module_id>/<level_id>/materials", data = "<spec>", format = "json")]
async fn add_material(
    module_id: &str,
    level_id: &str,
    spec: Json<MaterialSpec>,
    learning: &State<SharedLearning>,
) -> Result<Json<LearningMaterial>> {
    let mut learning = learning.lock().await;
    Ok(Json(learning.add_material(module_id, level_id, spec.0).await?))
}

#[post("/learning/<module_id>/<level_id>/messages", data = "<spec>", format = "json")]
async fn post_message(
    module_id: &str,
    level_id: &str,
    spec: Json<MessageSpec>,
    learning: &State<SharedLearning>,
) -> Result<Json<DiscussionMessage>> {
    let mut learning = learning.lock().await;
    let message = learning
        .post_message(module_id, level_id, spec.0, Utc::now())
        .await?;
    Ok(Json(message))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiveSession {
    live_session_active: bool,
}

#[post("/learning/<module_id>/<level_id>/live")]
async fn toggle_live_session(
    module_id: &str,
    level_id: &str,
    learning: &State<SharedLearning>,
) -> Result<Json<LiveSession>> {
    let mut learning = learning.lock().await;
    let live_session_active = learning.toggle_live_session(module_id, level_id).await?;
    Ok(Json(LiveSession {
        live_session_active,
    }))
}

/// Draft questions for the assessment builder. Nothing is saved; an empty
/// list means the assistant could not help.
#[post("/learning/generate", data = "<request>", format = "json")]
async fn generate_questions(
    request: Json<GenerateRequest>,
    assistant: &State<Arc<dyn Assistant>>,
) -> Json<Vec<QuizQuestion>> {
    let count = request
        .count
        .unwrap_or(DEFAULT_QUESTION_COUNT)
        .clamp(1, MAX_QUESTION_COUNT);
    Json(assistant.generate_quiz(&request.topic, count).await)
}
