use log::{debug, error, warn};
use reqwest::Client;
use rocket::serde::json::{serde_json, serde_json::json, Value};
use serde::Deserialize;

use crate::model::generate_id;
use crate::model::learning::{QuestionKind, QuizQuestion};

use super::{Assistant, ANALYSIS_FAILED, ANALYSIS_UNAVAILABLE};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiAssistant {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// A question as the model is asked to produce it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestion {
    text: String,
    options: Vec<String>,
    correct_answer: i64,
    explanation: Option<String>,
}

impl GeminiAssistant {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Send a prompt and return the text of the first candidate, if any.
    async fn generate(&self, prompt: String, config: Option<Value>) -> reqwest::Result<Option<String>> {
        let mut body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        if let Some(config) = config {
            body["generationConfig"] = config;
        }

        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let response: GenerateResponse = self
            .client
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|text| !text.trim().is_empty()))
    }
}

#[rocket::async_trait]
impl Assistant for GeminiAssistant {
    async fn generate_quiz(&self, topic: &str, count: usize) -> Vec<QuizQuestion> {
        let prompt = format!(
            "Create a multiple choice quiz about \"{topic}\" with {count} questions suitable for \
             university level students. Ensure 'type' is always 'MCQ'."
        );
        let config = json!({
            "responseMimeType": "application/json",
            "responseSchema": question_schema(),
        });

        match self.generate(prompt, Some(config)).await {
            Ok(Some(text)) => parse_generated_questions(&text),
            Ok(None) => {
                warn!("Quiz generation for '{topic}' returned no text");
                Vec::new()
            }
            Err(e) => {
                error!("Quiz generation for '{topic}' failed: {e}");
                Vec::new()
            }
        }
    }

    async fn analyze_financial_health(&self, summary: &str) -> String {
        let prompt = format!(
            "Act as a financial analyst for Baobab Institute. Analyze the following transaction \
             summary and give a brief, 1-paragraph strategic insight on financial health: {summary}"
        );
        match self.generate(prompt, None).await {
            Ok(Some(text)) => text,
            Ok(None) => ANALYSIS_UNAVAILABLE.to_string(),
            Err(e) => {
                error!("Financial analysis failed: {e}");
                ANALYSIS_FAILED.to_string()
            }
        }
    }
}

fn question_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "text": { "type": "STRING", "description": "The question text" },
                "type": { "type": "STRING", "enum": ["MCQ"] },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "Array of 4 options"
                },
                "correctAnswer": {
                    "type": "INTEGER",
                    "description": "Index of the correct option (0-3)"
                },
                "explanation": { "type": "STRING", "description": "Brief explanation of the answer" }
            },
            "required": ["text", "type", "options", "correctAnswer"]
        }
    })
}

/// Turn the model's JSON into questions with fresh ids. Malformed output
/// yields nothing; questions whose answer index is out of range are dropped.
pub(super) fn parse_generated_questions(text: &str) -> Vec<QuizQuestion> {
    let generated: Vec<GeneratedQuestion> = match serde_json::from_str(text) {
        Ok(generated) => generated,
        Err(e) => {
            warn!("Discarding unparseable generated quiz: {e}");
            return Vec::new();
        }
    };

    generated
        .into_iter()
        .filter_map(|q| {
            let correct_answer = usize::try_from(q.correct_answer)
                .ok()
                .filter(|&i| i < q.options.len());
            if correct_answer.is_none() {
                debug!("Dropping generated question with answer {}: {}", q.correct_answer, q.text);
            }
            Some(QuizQuestion {
                id: generate_id("q_gen"),
                text: q.text,
                kind: QuestionKind::MultipleChoice {
                    options: q.options,
                    correct_answer: correct_answer?,
                },
                explanation: q.explanation,
            })
        })
        .collect()
}
