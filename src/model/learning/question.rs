use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single assessment question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// The question variants, each with its own encoding of the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum QuestionKind {
    #[serde(rename = "MCQ", rename_all = "camelCase")]
    MultipleChoice {
        options: Vec<String>,
        /// Index into `options`.
        correct_answer: usize,
    },
    #[serde(rename_all = "camelCase")]
    TrueFalse { correct_answer: bool },
    #[serde(rename_all = "camelCase")]
    ShortAnswer { correct_answer: String },
    #[serde(rename_all = "camelCase")]
    Matching { matching_pairs: Vec<MatchingPair> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

/// A submitted answer. The JSON shape picks the variant: a number, a
/// boolean, a string, or an object mapping left items to right items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(usize),
    Truth(bool),
    Text(String),
    Pairs(HashMap<String, String>),
}

/// Answers keyed by question ID.
pub type Answers = HashMap<String, Answer>;

/// The outcome of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    /// Whole-number percentage.
    pub score: u32,
    pub competency_achieved: bool,
}

/// Scores at or above this percentage achieve the competency.
const PASS_MARK: u32 = 50;

impl QuizQuestion {
    /// Is `answer` correct for this question? A missing answer or one of the
    /// wrong shape is simply wrong.
    pub fn is_correct(&self, answer: Option<&Answer>) -> bool {
        match (&self.kind, answer) {
            (QuestionKind::MultipleChoice { correct_answer, .. }, Some(Answer::Choice(choice))) => {
                choice == correct_answer
            }
            (QuestionKind::TrueFalse { correct_answer }, Some(Answer::Truth(truth))) => {
                truth == correct_answer
            }
            (QuestionKind::ShortAnswer { correct_answer }, Some(Answer::Text(text))) => {
                normalise(text) == normalise(correct_answer)
            }
            (QuestionKind::Matching { matching_pairs }, answer) => {
                let submitted = match answer {
                    Some(Answer::Pairs(pairs)) => Some(pairs),
                    _ => None,
                };
                // Every declared pair must be matched; no pairs means nothing to get wrong.
                matching_pairs
                    .iter()
                    .all(|pair| submitted.and_then(|s| s.get(&pair.left)) == Some(&pair.right))
            }
            _ => false,
        }
    }
}

impl QuizScore {
    /// Grade `answers` against `questions`.
    pub fn grade(questions: &[QuizQuestion], answers: &Answers) -> Self {
        let total = questions.len();
        let correct = questions
            .iter()
            .filter(|q| q.is_correct(answers.get(&q.id)))
            .count();
        let score = if total == 0 {
            0
        } else {
            (correct as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            correct,
            total,
            score,
            competency_achieved: score >= PASS_MARK,
        }
    }
}

fn normalise(text: &str) -> String {
    text.trim().to_lowercase()
}
