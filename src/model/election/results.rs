use serde::{Deserialize, Serialize};

use super::{Candidate, CandidateId, ElectionPosition, PositionId};

/// One candidate's share of a position's votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStanding {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub votes: u32,
    /// Percentage of the position's votes, to one decimal place.
    pub percentage: f64,
}

/// Tabulated results for a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResults {
    pub position_id: PositionId,
    pub title: String,
    pub total_votes: u32,
    /// Sorted by votes, highest first. Equal counts keep the order in which
    /// the candidates were added.
    pub standings: Vec<CandidateStanding>,
}

impl PositionResults {
    pub fn tabulate(position: &ElectionPosition, candidates: &[Candidate]) -> Self {
        let standing: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| c.position_id == position.id)
            .collect();
        let total_votes = standing.iter().map(|c| c.votes).sum();

        let mut standings: Vec<CandidateStanding> = standing
            .into_iter()
            .map(|c| CandidateStanding {
                candidate_id: c.id.clone(),
                candidate_name: c.name.clone(),
                votes: c.votes,
                percentage: percentage(c.votes, total_votes),
            })
            .collect();
        // `sort_by` is stable, which is what resolves ties.
        standings.sort_by(|a, b| b.votes.cmp(&a.votes));

        Self {
            position_id: position.id.clone(),
            title: position.title.clone(),
            total_votes,
            standings,
        }
    }

    /// The front-runner, if anyone has any votes.
    pub fn leader(&self) -> Option<&CandidateStanding> {
        self.standings.first().filter(|s| s.votes > 0)
    }
}

fn percentage(votes: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (f64::from(votes) * 1000.0 / f64::from(total)).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::election::{CandidateSpec, PositionSpec};

    fn candidate(id: &str, position: &str, votes: u32) -> Candidate {
        let mut c = Candidate::from_spec(CandidateSpec::new(id.to_uppercase(), position));
        c.id = id.to_string();
        c.votes = votes;
        c
    }

    fn president() -> ElectionPosition {
        let mut p = ElectionPosition::from_spec(PositionSpec::titled("President"));
        p.id = "p1".to_string();
        p
    }

    #[test]
    fn sorted_with_percentages() {
        let candidates = vec![
            candidate("c2", "p1", 1),
            candidate("c1", "p1", 2),
            candidate("c9", "p2", 40),
        ];
        let results = PositionResults::tabulate(&president(), &candidates);
        assert_eq!(results.total_votes, 3);
        let summary: Vec<(&str, u32, f64)> = results
            .standings
            .iter()
            .map(|s| (s.candidate_id.as_str(), s.votes, s.percentage))
            .collect();
        assert_eq!(summary, vec![("c1", 2, 66.7), ("c2", 1, 33.3)]);
        assert_eq!(results.leader().unwrap().candidate_id, "c1");
    }

    #[test]
    fn ties_keep_insertion_order() {
        let candidates = vec![
            candidate("c1", "p1", 3),
            candidate("c2", "p1", 5),
            candidate("c3", "p1", 3),
            candidate("c4", "p1", 5),
        ];
        let results = PositionResults::tabulate(&president(), &candidates);
        let order: Vec<&str> = results
            .standings
            .iter()
            .map(|s| s.candidate_id.as_str())
            .collect();
        assert_eq!(order, vec!["c2", "c4", "c1", "c3"]);
        assert_eq!(results.standings[0].percentage, 31.3);
    }

    #[test]
    fn no_votes_no_leader() {
        let candidates = vec![candidate("c1", "p1", 0), candidate("c2", "p1", 0)];
        let results = PositionResults::tabulate(&president(), &candidates);
        assert_eq!(results.total_votes, 0);
        assert!(results.standings.iter().all(|s| s.percentage == 0.0));
        assert_eq!(results.leader(), None);

        let empty = PositionResults::tabulate(&president(), &[]);
        assert!(empty.standings.is_empty());
        assert_eq!(empty.leader(), None);
    }
}
