use serde::{Deserialize, Serialize};

use crate::model::generate_id;

use super::{CandidateId, PositionId};

/// A student standing for a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    /// Link to the student record.
    pub student_id: String,
    pub name: String,
    pub position_id: PositionId,
    pub manifesto: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Only ever changed by tabulation and reset.
    pub votes: u32,
}

/// The editable part of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSpec {
    pub name: String,
    pub position_id: PositionId,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub manifesto: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Candidate {
    /// Build a new candidate with zero votes and a fresh ID.
    pub fn from_spec(spec: CandidateSpec) -> Self {
        let id = generate_id("cand");
        let student_id = spec
            .student_id
            .unwrap_or_else(|| id.replacen("cand", "temp", 1));
        Self {
            id,
            student_id,
            name: spec.name.trim().to_string(),
            position_id: spec.position_id,
            manifesto: spec.manifesto,
            photo: spec.photo,
            votes: 0,
        }
    }

    /// Apply an edit. The vote count is never touched.
    pub fn apply(&mut self, spec: CandidateSpec) {
        self.name = spec.name.trim().to_string();
        self.position_id = spec.position_id;
        self.manifesto = spec.manifesto;
        if let Some(student_id) = spec.student_id {
            self.student_id = student_id;
        }
        if spec.photo.is_some() {
            self.photo = spec.photo;
        }
    }
}

impl CandidateSpec {
    pub fn new(name: impl Into<String>, position_id: impl Into<PositionId>) -> Self {
        Self {
            name: name.into(),
            position_id: position_id.into(),
            student_id: None,
            manifesto: String::new(),
            photo: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_keep_votes() {
        let mut candidate = Candidate::from_spec(CandidateSpec::new(" Asha Rose ", "pos1"));
        assert_eq!(candidate.name, "Asha Rose");
        assert!(candidate.student_id.starts_with("temp_"));
        candidate.votes = 7;

        let mut edit = CandidateSpec::new("Asha R.", "pos2");
        edit.manifesto = "Digital library".to_string();
        candidate.apply(edit);
        assert_eq!(candidate.name, "Asha R.");
        assert_eq!(candidate.position_id, "pos2");
        assert_eq!(candidate.votes, 7);
    }

    #[test]
    fn camel_case_json() {
        let json = r#"{"id":"cand1","studentId":"s1","name":"Juma Hassan","positionId":"pos1","manifesto":"","votes":45}"#;
        let candidate: Candidate = rocket::serde::json::serde_json::from_str(json).unwrap();
        assert_eq!(candidate.position_id, "pos1");
        assert_eq!(candidate.votes, 45);
        assert_eq!(candidate.photo, None);
    }
}
