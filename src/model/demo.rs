//! Sample roster and course content, installed by `seed_demo_data` into an
//! empty store.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use super::election::{Candidate, ElectionPosition};
use super::learning::{
    CompetencyLevel, DiscussionMessage, LearningMaterial, MaterialKind, MessageKind,
    ModuleContent, QuestionKind, Quiz, QuizQuestion, QuizStatus, UserRole,
};

pub fn positions() -> Vec<ElectionPosition> {
    [
        ("pos1", "President", "Student Organization President"),
        ("pos2", "Vice President", "Student Organization Vice President"),
        ("pos3", "General Secretary", "Head of Secretariat"),
    ]
    .into_iter()
    .map(|(id, title, description)| ElectionPosition {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        max_votes: 1,
    })
    .collect()
}

pub fn candidates() -> Vec<Candidate> {
    [
        ("cand1", "s1", "Juma Hassan", "pos1", "I promise better internet connectivity for all students.", 45),
        ("cand2", "s2", "Asha Rose", "pos1", "Focusing on academic excellence and digital library resources.", 38),
        ("cand3", "s3", "Baraka John", "pos2", "Sports and entertainment reform.", 62),
    ]
    .into_iter()
    .map(|(id, student_id, name, position_id, manifesto, votes)| Candidate {
        id: id.into(),
        student_id: student_id.into(),
        name: name.into(),
        position_id: position_id.into(),
        manifesto: manifesto.into(),
        photo: None,
        votes,
    })
    .collect()
}

/// Two modules: pharmaceutical calculations with a scheduled quiz, and an
/// introductory logic level whose quiz opened at `now`.
pub fn learning_content(now: DateTime<Utc>) -> Vec<ModuleContent> {
    let measurement = CompetencyLevel {
        id: "lvl1".into(),
        level_number: 1,
        title: "Fundamentals of Pharmaceutical Measurement".into(),
        description: "Introduction to the metric system, common household measures, and conversions."
            .into(),
        materials: vec![
            material("mat1", "Lecture Notes: Metric System", MaterialKind::Pdf, Some("Core concepts of grams, liters, and meters.")),
            material("mat2", "Video: Converting Units", MaterialKind::Video, Some("Step-by-step guide to dimensional analysis.")),
        ],
        quiz: Some(Quiz {
            id: "q1".into(),
            title: "Competency Test: Unit Conversions".into(),
            duration_minutes: 30,
            status: QuizStatus::Scheduled,
            scheduled_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            started_at: None,
            questions: vec![
                question(
                    "q1_1",
                    "Convert 2.5 grams to milligrams.",
                    QuestionKind::MultipleChoice {
                        options: vec!["25 mg".into(), "250 mg".into(), "2500 mg".into(), "0.0025 mg".into()],
                        correct_answer: 2,
                    },
                    "To convert grams to milligrams, multiply by 1000. 2.5 * 1000 = 2500 mg.",
                ),
                question(
                    "q1_2",
                    "A teaspoon is approximately equivalent to 5 mL.",
                    QuestionKind::TrueFalse { correct_answer: true },
                    "Standard pharmaceutical practice accepts 1 teaspoon = 5 mL.",
                ),
                question(
                    "q1_3",
                    "Calculate the total volume if a patient takes 1 tablespoon twice daily for 7 days. (Answer in mL)",
                    QuestionKind::ShortAnswer { correct_answer: "210".into() },
                    "1 tablespoon = 15 mL. Twice daily = 30 mL/day. 7 days = 30 * 7 = 210 mL.",
                ),
            ],
        }),
        discussions: vec![
            message("d1", ("st1", "Dr. John Doe", UserRole::Staff), "Welcome to Level 1. Please review the metric system notes before our live session.", at(9, 0)),
            message("d2", ("s1", "Juma Hassan", UserRole::Student), "Doctor, is the \"grain\" unit still examinable in NTA Level 4?", at(10, 15)),
        ],
        live_session_active: true,
    };
    let ratios = CompetencyLevel {
        id: "lvl2".into(),
        level_number: 2,
        title: "Ratio and Proportion".into(),
        description: "Applying ratios to dosage calculations.".into(),
        materials: Vec::new(),
        quiz: None,
        discussions: Vec::new(),
        live_session_active: false,
    };
    let logic = CompetencyLevel {
        id: "lvl_cs_1".into(),
        level_number: 1,
        title: "Introduction to Logic".into(),
        description: "Boolean logic and flowcharts.".into(),
        materials: vec![material("m_cs_1", "Logic Gates PDF", MaterialKind::Pdf, None)],
        quiz: Some(Quiz {
            id: "q_cs_1".into(),
            title: "Logic Quiz".into(),
            duration_minutes: 15,
            status: QuizStatus::Active,
            scheduled_date: None,
            started_at: Some(now),
            questions: vec![QuizQuestion {
                id: "q_cs_1a".into(),
                text: "What is the output of TRUE AND FALSE?".into(),
                kind: QuestionKind::MultipleChoice {
                    options: vec!["TRUE".into(), "FALSE".into(), "NULL".into(), "undefined".into()],
                    correct_answer: 1,
                },
                explanation: None,
            }],
        }),
        discussions: Vec::new(),
        live_session_active: false,
    };

    vec![
        ModuleContent {
            module_id: "m4".into(),
            levels: vec![measurement, ratios],
        },
        ModuleContent {
            module_id: "m1".into(),
            levels: vec![logic],
        },
    ]
}

fn material(id: &str, title: &str, kind: MaterialKind, description: Option<&str>) -> LearningMaterial {
    LearningMaterial {
        id: id.into(),
        title: title.into(),
        kind,
        url: "#".into(),
        description: description.map(Into::into),
    }
}

fn question(id: &str, text: &str, kind: QuestionKind, explanation: &str) -> QuizQuestion {
    QuizQuestion {
        id: id.into(),
        text: text.into(),
        kind,
        explanation: Some(explanation.into()),
    }
}

fn message(
    id: &str,
    (user_id, user_name, user_role): (&str, &str, UserRole),
    content: &str,
    timestamp: DateTime<Utc>,
) -> DiscussionMessage {
    DiscussionMessage {
        id: id.into(),
        user_id: user_id.into(),
        user_name: user_name.into(),
        user_role,
        content: content.into(),
        kind: MessageKind::Text,
        timestamp,
    }
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
