use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Rejection;

use super::{Answers, QuizQuestion, QuizScore};

/// Extra time allowed after a quiz's duration before the sweep closes it.
pub const EXPIRY_GRACE_MINUTES: i64 = 15;

/// Default duration for newly saved quizzes.
const DEFAULT_DURATION_MINUTES: u32 = 30;

/// States in the quiz lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizStatus {
    /// Being written; invisible to students.
    Draft,
    /// Ready and announced, not yet open.
    Scheduled,
    /// Open for submissions.
    Active,
    /// Closed, either by the lecturer or by expiry.
    Completed,
}

/// Lifecycle operations, for rejection messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizAction {
    Launch,
    End,
    Submit,
    Edit,
}

/// An assessment attached to a competency level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub duration_minutes: u32,
    pub questions: Vec<QuizQuestion>,
    pub status: QuizStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    /// When the quiz last became active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

/// A lecturer's quiz as submitted from the assessment builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub title: String,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub status: Option<QuizStatus>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
}

impl Quiz {
    /// Build a quiz from a draft, reusing `id`. Saving may only produce a
    /// Draft or Scheduled quiz; anything else must go through the lifecycle.
    pub fn from_draft(id: String, draft: QuizDraft) -> Result<Self, String> {
        if draft.title.trim().is_empty() {
            return Err("A quiz needs a title".to_string());
        }
        if draft.questions.is_empty() {
            return Err("A quiz needs at least one question".to_string());
        }
        let status = match draft.status.unwrap_or(QuizStatus::Scheduled) {
            status @ (QuizStatus::Draft | QuizStatus::Scheduled) => status,
            other => return Err(format!("A quiz cannot be saved as {other}")),
        };
        let duration_minutes = match draft.duration_minutes {
            Some(0) | None => DEFAULT_DURATION_MINUTES,
            Some(minutes) => minutes,
        };

        Ok(Self {
            id,
            title: draft.title.trim().to_string(),
            duration_minutes,
            questions: draft.questions,
            status,
            scheduled_date: draft.scheduled_date,
            started_at: None,
        })
    }

    /// Open the quiz. Re-launching a completed quiz is allowed.
    pub fn launch(&mut self, now: DateTime<Utc>) -> Result<(), Rejection> {
        if self.status == QuizStatus::Active {
            return Err(self.rejection(QuizAction::Launch));
        }
        self.status = QuizStatus::Active;
        self.started_at = Some(now);
        Ok(())
    }

    /// Close an active quiz.
    pub fn end(&mut self) -> Result<(), Rejection> {
        if self.status != QuizStatus::Active {
            return Err(self.rejection(QuizAction::End));
        }
        self.status = QuizStatus::Completed;
        Ok(())
    }

    /// Force the quiz back to Draft from any state.
    pub fn reset_to_draft(&mut self) {
        self.status = QuizStatus::Draft;
        self.started_at = None;
    }

    /// Can the quiz be replaced from the builder?
    pub fn check_editable(&self) -> Result<(), Rejection> {
        match self.status {
            QuizStatus::Draft | QuizStatus::Scheduled => Ok(()),
            _ => Err(self.rejection(QuizAction::Edit)),
        }
    }

    /// The instant after which an active quiz is closed by the sweep.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let duration = Duration::minutes(i64::from(self.duration_minutes));
        self.started_at
            .map(|start| start + duration + Duration::minutes(EXPIRY_GRACE_MINUTES))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == QuizStatus::Active && self.expires_at().map_or(false, |end| now > end)
    }

    /// Grade a submission. Only an active quiz accepts submissions.
    pub fn grade(&self, answers: &Answers) -> Result<QuizScore, Rejection> {
        if self.status != QuizStatus::Active {
            return Err(self.rejection(QuizAction::Submit));
        }
        Ok(QuizScore::grade(&self.questions, answers))
    }

    fn rejection(&self, action: QuizAction) -> Rejection {
        Rejection::Quiz {
            action,
            status: self.status,
        }
    }
}

impl Display for QuizStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Active => "Active",
            Self::Completed => "Completed",
        };
        f.write_str(text)
    }
}

impl Display for QuizAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Launch => "launch",
            Self::End => "end",
            Self::Submit => "submit to",
            Self::Edit => "edit",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use crate::model::learning::{Answer, QuestionKind};

    use super::*;

    fn draft() -> QuizDraft {
        QuizDraft {
            title: "Logic Quiz".into(),
            duration_minutes: Some(30),
            questions: vec![QuizQuestion {
                id: "q1".into(),
                text: "TRUE AND FALSE?".into(),
                kind: QuestionKind::MultipleChoice {
                    options: vec!["TRUE".into(), "FALSE".into()],
                    correct_answer: 1,
                },
                explanation: None,
            }],
            status: None,
            scheduled_date: None,
        }
    }

    fn quiz() -> Quiz {
        Quiz::from_draft("quiz1".into(), draft()).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn drafts() {
        let quiz = quiz();
        assert_eq!(quiz.status, QuizStatus::Scheduled);
        assert_eq!(quiz.started_at, None);

        let mut untimed = draft();
        untimed.duration_minutes = None;
        untimed.status = Some(QuizStatus::Draft);
        let untimed = Quiz::from_draft("quiz2".into(), untimed).unwrap();
        assert_eq!(untimed.duration_minutes, 30);
        assert_eq!(untimed.status, QuizStatus::Draft);

        let mut blank = draft();
        blank.title = " ".into();
        assert!(Quiz::from_draft("x".into(), blank).is_err());

        let mut empty = draft();
        empty.questions.clear();
        assert!(Quiz::from_draft("x".into(), empty).is_err());

        let mut active = draft();
        active.status = Some(QuizStatus::Active);
        assert!(Quiz::from_draft("x".into(), active).is_err());
    }

    #[test]
    fn lifecycle() {
        let mut quiz = quiz();
        assert!(quiz.end().is_err());

        quiz.launch(t0()).unwrap();
        assert_eq!(quiz.status, QuizStatus::Active);
        assert_eq!(quiz.started_at, Some(t0()));
        assert_eq!(
            quiz.launch(t0()),
            Err(Rejection::Quiz {
                action: QuizAction::Launch,
                status: QuizStatus::Active
            })
        );
        assert!(quiz.check_editable().is_err());

        quiz.end().unwrap();
        assert_eq!(quiz.status, QuizStatus::Completed);
        assert!(quiz.end().is_err());

        // Re-launch restarts the clock.
        let later = t0() + Duration::days(1);
        quiz.launch(later).unwrap();
        assert_eq!(quiz.started_at, Some(later));

        quiz.reset_to_draft();
        assert_eq!(quiz.status, QuizStatus::Draft);
        assert_eq!(quiz.started_at, None);
        assert!(quiz.check_editable().is_ok());
        // Straight from Draft is fine too.
        quiz.launch(later).unwrap();
    }

    #[test]
    fn expiry_includes_grace() {
        let mut quiz = quiz();
        assert!(!quiz.is_expired(t0() + Duration::days(365)));

        quiz.launch(t0()).unwrap();
        assert_eq!(quiz.expires_at(), Some(t0() + Duration::minutes(45)));
        assert!(!quiz.is_expired(t0() + Duration::minutes(44)));
        assert!(!quiz.is_expired(t0() + Duration::minutes(45)));
        assert!(quiz.is_expired(t0() + Duration::minutes(46)));

        quiz.end().unwrap();
        assert!(!quiz.is_expired(t0() + Duration::minutes(46)));
    }

    #[test]
    fn submissions_need_an_active_quiz() {
        let mut quiz = quiz();
        let answers: Answers = [("q1".to_string(), Answer::Choice(1))].into_iter().collect();
        assert!(matches!(
            quiz.grade(&answers),
            Err(Rejection::Quiz {
                action: QuizAction::Submit,
                ..
            })
        ));

        quiz.launch(t0()).unwrap();
        assert_eq!(quiz.grade(&answers).unwrap().score, 100);
    }
}
