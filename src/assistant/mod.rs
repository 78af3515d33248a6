//! Generative assistance for lecturers and the finance office.
//!
//! The assistant never fails outward: quiz generation degrades to no
//! questions and analysis degrades to a fixed message.

use log::debug;

use crate::model::learning::QuizQuestion;

pub use gemini::GeminiAssistant;

mod gemini;

/// Returned when the service answers with no text.
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis unavailable.";

/// Returned when the service cannot be reached or errors.
pub const ANALYSIS_FAILED: &str = "Unable to generate AI analysis at this time.";

#[rocket::async_trait]
pub trait Assistant: Send + Sync {
    /// Draft `count` multiple-choice questions about `topic`.
    async fn generate_quiz(&self, topic: &str, count: usize) -> Vec<QuizQuestion>;

    /// A one-paragraph reading of a financial summary.
    async fn analyze_financial_health(&self, summary: &str) -> String;
}

/// Stands in when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAssistant;

#[rocket::async_trait]
impl Assistant for NoopAssistant {
    async fn generate_quiz(&self, topic: &str, _count: usize) -> Vec<QuizQuestion> {
        debug!("No assistant configured, not generating a quiz on '{topic}'");
        Vec::new()
    }

    async fn analyze_financial_health(&self, _summary: &str) -> String {
        ANALYSIS_UNAVAILABLE.to_string()
    }
}
