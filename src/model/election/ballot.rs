use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::Rejection;

use super::{Candidate, CandidateId, ElectionPosition, PositionId};

/// A voter's selections: one candidate per position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ballot(pub BTreeMap<PositionId, CandidateId>);

impl Ballot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style selection, mostly for tests and seeding.
    pub fn select(mut self, position: impl Into<PositionId>, candidate: impl Into<CandidateId>) -> Self {
        self.0.insert(position.into(), candidate.into());
        self
    }

    /// Check that every selection names a candidate standing for that
    /// position, and that every contested position has a selection.
    ///
    /// A position is contested when at least one candidate stands for it.
    pub fn validate(
        &self,
        positions: &[ElectionPosition],
        candidates: &[Candidate],
    ) -> Result<(), Rejection> {
        for (position_id, candidate_id) in self.0.iter() {
            let standing = positions.iter().any(|p| &p.id == position_id)
                && candidates
                    .iter()
                    .any(|c| &c.id == candidate_id && &c.position_id == position_id);
            if !standing {
                return Err(Rejection::InvalidSelection {
                    position_id: position_id.clone(),
                    candidate_id: candidate_id.clone(),
                });
            }
        }

        let contested: HashSet<&PositionId> = candidates.iter().map(|c| &c.position_id).collect();
        let missing: Vec<PositionId> = positions
            .iter()
            .filter(|p| contested.contains(&p.id) && !self.0.contains_key(&p.id))
            .map(|p| p.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(Rejection::IncompleteBallot { missing });
        }

        Ok(())
    }

    pub fn selected(&self) -> impl Iterator<Item = &CandidateId> {
        self.0.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::election::{CandidateSpec, PositionSpec};

    fn roster() -> (Vec<ElectionPosition>, Vec<Candidate>) {
        let mut president = ElectionPosition::from_spec(PositionSpec::titled("President"));
        president.id = "p1".into();
        let mut secretary = ElectionPosition::from_spec(PositionSpec::titled("Secretary"));
        secretary.id = "p2".into();
        let mut treasurer = ElectionPosition::from_spec(PositionSpec::titled("Treasurer"));
        treasurer.id = "p3".into(); // Uncontested.

        let mut c1 = Candidate::from_spec(CandidateSpec::new("Juma", "p1"));
        c1.id = "c1".into();
        let mut c2 = Candidate::from_spec(CandidateSpec::new("Asha", "p1"));
        c2.id = "c2".into();
        let mut c3 = Candidate::from_spec(CandidateSpec::new("Baraka", "p2"));
        c3.id = "c3".into();

        (vec![president, secretary, treasurer], vec![c1, c2, c3])
    }

    #[test]
    fn full_ballot_is_valid() {
        let (positions, candidates) = roster();
        let ballot = Ballot::new().select("p1", "c2").select("p2", "c3");
        assert_eq!(ballot.validate(&positions, &candidates), Ok(()));
    }

    #[test]
    fn partial_ballot_is_rejected() {
        let (positions, candidates) = roster();
        let ballot = Ballot::new().select("p1", "c1");
        assert_eq!(
            ballot.validate(&positions, &candidates),
            Err(Rejection::IncompleteBallot {
                missing: vec!["p2".to_string()]
            })
        );
        assert!(matches!(
            Ballot::new().validate(&positions, &candidates),
            Err(Rejection::IncompleteBallot { .. })
        ));
    }

    #[test]
    fn wrong_position_is_rejected() {
        let (positions, candidates) = roster();
        let ballot = Ballot::new().select("p1", "c3").select("p2", "c3");
        assert_eq!(
            ballot.validate(&positions, &candidates),
            Err(Rejection::InvalidSelection {
                position_id: "p1".into(),
                candidate_id: "c3".into()
            })
        );

        let ballot = Ballot::new()
            .select("p1", "c1")
            .select("p2", "c3")
            .select("p9", "c1");
        assert!(matches!(
            ballot.validate(&positions, &candidates),
            Err(Rejection::InvalidSelection { .. })
        ));
    }

    #[test]
    fn json_is_a_plain_map() {
        let ballot: Ballot =
            rocket::serde::json::serde_json::from_str(r#"{"p1":"c1","p2":"c3"}"#).unwrap();
        assert_eq!(ballot, Ballot::new().select("p1", "c1").select("p2", "c3"));
    }
}
