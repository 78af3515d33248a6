use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Rejection;
use crate::store::{
    StateStore, CANDIDATES_KEY, HAS_VOTED_KEY, PHASE_KEY, POSITIONS_KEY, VOTERS_KEY,
};

use super::{
    Ballot, Candidate, CandidateSpec, ElectionPhase, ElectionPosition, PhaseAction,
    PositionResults, PositionSpec, VoterId,
};

/// The election: phase, roster, voter roll and vote record.
///
/// State is held in memory and written through to the store after every
/// mutation. Callers serialise access, so every operation is atomic.
pub struct ElectionController {
    store: Arc<dyn StateStore>,
    phase: ElectionPhase,
    positions: Vec<ElectionPosition>,
    candidates: Vec<Candidate>,
    voters: Vec<VoterId>,
    has_voted: Vec<VoterId>,
}

/// A read-only view of the whole election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSnapshot {
    pub phase: ElectionPhase,
    pub positions: Vec<ElectionPosition>,
    pub candidates: Vec<Candidate>,
    pub registered_voters: usize,
    pub ballots_cast: usize,
}

impl ElectionController {
    /// Load the election from the store. Absent keys start empty.
    pub async fn load(store: Arc<dyn StateStore>) -> Result<Self> {
        let phase = match store.get(PHASE_KEY).await? {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("{err}, falling back to {}", ElectionPhase::Idle);
                ElectionPhase::Idle
            }),
            None => ElectionPhase::Idle,
        };
        let positions: Vec<ElectionPosition> =
            store.load_json(POSITIONS_KEY).await?.unwrap_or_default();
        let candidates: Vec<Candidate> = store.load_json(CANDIDATES_KEY).await?.unwrap_or_default();
        let voters: Vec<VoterId> = store.load_json(VOTERS_KEY).await?.unwrap_or_default();
        let has_voted: Vec<VoterId> = store.load_json(HAS_VOTED_KEY).await?.unwrap_or_default();

        let election = Self {
            store,
            phase,
            positions,
            candidates,
            voters,
            has_voted,
        };
        debug!(
            "Loaded election: phase {}, {} positions, {} candidates, {} voters, {} ballots",
            election.phase,
            election.positions.len(),
            election.candidates.len(),
            election.voters.len(),
            election.has_voted.len()
        );
        Ok(election)
    }

    /// Install a starting roster if there is none yet. Returns whether it did.
    pub async fn seed_roster(
        &mut self,
        positions: Vec<ElectionPosition>,
        candidates: Vec<Candidate>,
    ) -> Result<bool> {
        if !self.positions.is_empty() || !self.candidates.is_empty() {
            return Ok(false);
        }
        self.positions = positions;
        self.candidates = candidates;
        self.save_positions().await?;
        self.save_candidates().await?;
        info!(
            "Seeded election roster with {} positions and {} candidates",
            self.positions.len(),
            self.candidates.len()
        );
        Ok(true)
    }

    pub fn phase(&self) -> ElectionPhase {
        self.phase
    }

    pub fn positions(&self) -> &[ElectionPosition] {
        &self.positions
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn voters(&self) -> &[VoterId] {
        &self.voters
    }

    pub fn has_voted(&self, voter_id: &str) -> bool {
        self.has_voted.iter().any(|v| v == voter_id)
    }

    pub fn snapshot(&self) -> ElectionSnapshot {
        ElectionSnapshot {
            phase: self.phase,
            positions: self.positions.clone(),
            candidates: self.candidates.clone(),
            registered_voters: self.voters.len(),
            ballots_cast: self.has_voted.len(),
        }
    }

    // Phase control.

    pub async fn start_registration(&mut self) -> Result<ElectionPhase> {
        self.advance(PhaseAction::StartRegistration).await
    }

    pub async fn end_registration(&mut self) -> Result<ElectionPhase> {
        self.advance(PhaseAction::EndRegistration).await
    }

    pub async fn start_voting(&mut self) -> Result<ElectionPhase> {
        self.advance(PhaseAction::StartVoting).await
    }

    pub async fn end_voting(&mut self) -> Result<ElectionPhase> {
        self.advance(PhaseAction::EndVoting).await
    }

    /// Return to IDLE, clearing the roll and vote record and zeroing every
    /// tally. Destructive, so the caller must pass `confirmed`.
    pub async fn reset(&mut self, confirmed: bool) -> Result<()> {
        if !confirmed {
            return Err(Rejection::ConfirmationRequired.into());
        }
        self.phase = self.phase.transition(PhaseAction::Reset)?;
        self.voters.clear();
        self.has_voted.clear();
        for candidate in self.candidates.iter_mut() {
            candidate.votes = 0;
        }

        self.save_phase().await?;
        self.store.remove(VOTERS_KEY).await?;
        self.store.remove(HAS_VOTED_KEY).await?;
        self.save_candidates().await?;
        warn!("Election reset: roll, ballots and tallies cleared");
        Ok(())
    }

    async fn advance(&mut self, action: PhaseAction) -> Result<ElectionPhase> {
        let next = self.phase.transition(action).map_err(|rejection| {
            debug!("Ignoring phase change: {rejection}");
            rejection
        })?;
        let previous = std::mem::replace(&mut self.phase, next);
        self.save_phase().await?;
        info!("Election phase {previous} -> {next}");
        Ok(next)
    }

    // Voting.

    /// Add a voter to the roll. Returns `false` if they were already on it.
    pub async fn register_voter(&mut self, voter_id: &str) -> Result<bool> {
        self.phase.permits(PhaseAction::RegisterVoter)?;
        if self.voters.iter().any(|v| v == voter_id) {
            return Ok(false);
        }
        self.voters.push(voter_id.to_string());
        self.save_voters().await?;
        info!("Registered voter {voter_id}");
        Ok(true)
    }

    /// Count a full ballot for a registered voter who has not yet voted.
    ///
    /// The ballot is only counted in memory once both the tallies and the vote
    /// record are stored. If the second write fails the store holds the new
    /// tallies without the voter, and reloading from it would count the ballot
    /// while letting the voter vote again.
    pub async fn cast_ballot(&mut self, voter_id: &str, ballot: &Ballot) -> Result<()> {
        self.phase.permits(PhaseAction::CastBallot)?;
        if !self.voters.iter().any(|v| v == voter_id) {
            return Err(Rejection::NotRegistered(voter_id.to_string()).into());
        }
        if self.has_voted(voter_id) {
            return Err(Rejection::AlreadyVoted(voter_id.to_string()).into());
        }
        ballot.validate(&self.positions, &self.candidates)?;

        let mut candidates = self.candidates.clone();
        for candidate_id in ballot.selected() {
            // Presence already checked by `validate`.
            if let Some(candidate) = candidates.iter_mut().find(|c| &c.id == candidate_id) {
                candidate.votes += 1;
            }
        }
        let mut has_voted = self.has_voted.clone();
        has_voted.push(voter_id.to_string());

        self.store.save_json(CANDIDATES_KEY, &candidates).await?;
        self.store.save_json(HAS_VOTED_KEY, &has_voted).await?;
        self.candidates = candidates;
        self.has_voted = has_voted;
        info!("Counted ballot from voter {voter_id}");
        Ok(())
    }

    // Results.

    pub fn results(&self, position_id: &str) -> Result<PositionResults> {
        let position = self
            .positions
            .iter()
            .find(|p| p.id == position_id)
            .ok_or_else(|| Error::not_found(format!("Position '{position_id}'")))?;
        Ok(PositionResults::tabulate(position, &self.candidates))
    }

    /// Results for every position that has candidates, in position order.
    pub fn all_results(&self) -> Vec<PositionResults> {
        self.positions
            .iter()
            .filter(|p| self.candidates.iter().any(|c| c.position_id == p.id))
            .map(|p| PositionResults::tabulate(p, &self.candidates))
            .collect()
    }

    // Roster management.

    pub async fn add_position(&mut self, spec: PositionSpec) -> Result<ElectionPosition> {
        self.phase.permits(PhaseAction::EditRoster)?;
        if spec.title.trim().is_empty() {
            return Err(Error::bad_request("Position title is required"));
        }
        let position = ElectionPosition::from_spec(spec);
        self.positions.push(position.clone());
        self.save_positions().await?;
        info!("Added position {} ({})", position.id, position.title);
        Ok(position)
    }

    pub async fn delete_position(&mut self, position_id: &str) -> Result<()> {
        self.phase.permits(PhaseAction::EditRoster)?;
        let index = self
            .positions
            .iter()
            .position(|p| p.id == position_id)
            .ok_or_else(|| Error::not_found(format!("Position '{position_id}'")))?;
        if self.candidates.iter().any(|c| c.position_id == position_id) {
            return Err(Rejection::PositionInUse(position_id.to_string()).into());
        }
        self.positions.remove(index);
        self.save_positions().await?;
        info!("Deleted position {position_id}");
        Ok(())
    }

    pub async fn add_candidate(&mut self, spec: CandidateSpec) -> Result<Candidate> {
        self.phase.permits(PhaseAction::EditRoster)?;
        self.check_candidate_spec(&spec)?;
        let candidate = Candidate::from_spec(spec);
        self.candidates.push(candidate.clone());
        self.save_candidates().await?;
        info!(
            "Added candidate {} ({}) for position {}",
            candidate.id, candidate.name, candidate.position_id
        );
        Ok(candidate)
    }

    pub async fn update_candidate(
        &mut self,
        candidate_id: &str,
        spec: CandidateSpec,
    ) -> Result<Candidate> {
        self.phase.permits(PhaseAction::EditRoster)?;
        self.check_candidate_spec(&spec)?;
        let candidate = self
            .candidates
            .iter_mut()
            .find(|c| c.id == candidate_id)
            .ok_or_else(|| Error::not_found(format!("Candidate '{candidate_id}'")))?;
        candidate.apply(spec);
        let updated = candidate.clone();
        self.save_candidates().await?;
        info!("Updated candidate {candidate_id}");
        Ok(updated)
    }

    pub async fn delete_candidate(&mut self, candidate_id: &str) -> Result<()> {
        self.phase.permits(PhaseAction::EditRoster)?;
        let before = self.candidates.len();
        self.candidates.retain(|c| c.id != candidate_id);
        if self.candidates.len() == before {
            return Err(Error::not_found(format!("Candidate '{candidate_id}'")));
        }
        self.save_candidates().await?;
        info!("Deleted candidate {candidate_id}");
        Ok(())
    }

    fn check_candidate_spec(&self, spec: &CandidateSpec) -> Result<()> {
        if spec.name.trim().is_empty() {
            return Err(Error::bad_request("Candidate name is required"));
        }
        if !self.positions.iter().any(|p| p.id == spec.position_id) {
            return Err(Error::bad_request(format!(
                "Position '{}' does not exist",
                spec.position_id
            )));
        }
        Ok(())
    }

    // Persistence. Each key is written on its own.

    async fn save_phase(&self) -> Result<()> {
        self.store.set(PHASE_KEY, self.phase.to_string()).await
    }

    async fn save_positions(&self) -> Result<()> {
        self.store.save_json(POSITIONS_KEY, &self.positions).await
    }

    async fn save_candidates(&self) -> Result<()> {
        self.store.save_json(CANDIDATES_KEY, &self.candidates).await
    }

    async fn save_voters(&self) -> Result<()> {
        self.store.save_json(VOTERS_KEY, &self.voters).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::store::MemoryStore;

    use super::*;

    /// An election over a fresh in-memory store, with the given roster.
    async fn election_with(
        positions: &[(&str, &str)],
        candidates: &[(&str, &str)],
    ) -> (ElectionController, MemoryStore) {
        let store = MemoryStore::default();
        let mut election = ElectionController::load(Arc::new(store.clone()))
            .await
            .unwrap();
        let positions = positions
            .iter()
            .map(|(id, title)| ElectionPosition {
                id: id.to_string(),
                title: title.to_string(),
                description: String::new(),
                max_votes: 1,
            })
            .collect();
        let candidates = candidates
            .iter()
            .map(|(id, position)| {
                let mut c = Candidate::from_spec(CandidateSpec::new(id.to_uppercase(), *position));
                c.id = id.to_string();
                c
            })
            .collect();
        election.seed_roster(positions, candidates).await.unwrap();
        (election, store)
    }

    async fn president_race() -> (ElectionController, MemoryStore) {
        election_with(&[("p1", "President")], &[("c1", "p1"), ("c2", "p1")]).await
    }

    fn votes(election: &ElectionController, id: &str) -> u32 {
        election
            .candidates()
            .iter()
            .find(|c| c.id == id)
            .unwrap()
            .votes
    }

    fn rejection(result: Result<impl std::fmt::Debug>) -> Rejection {
        match result {
            Err(Error::Rejected(rejection)) => rejection,
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[rocket::async_test]
    async fn president_scenario() {
        let (mut election, _) = president_race().await;
        election.start_registration().await.unwrap();
        for voter in ["v1", "v2", "v3"] {
            assert!(election.register_voter(voter).await.unwrap());
        }
        election.end_registration().await.unwrap();
        election.start_voting().await.unwrap();

        let for_c1 = Ballot::new().select("p1", "c1");
        let for_c2 = Ballot::new().select("p1", "c2");
        election.cast_ballot("v1", &for_c1).await.unwrap();
        election.cast_ballot("v2", &for_c1).await.unwrap();
        election.cast_ballot("v3", &for_c2).await.unwrap();

        assert_eq!(votes(&election, "c1"), 2);
        assert_eq!(votes(&election, "c2"), 1);

        let results = election.results("p1").unwrap();
        let summary: Vec<(&str, u32, f64)> = results
            .standings
            .iter()
            .map(|s| (s.candidate_id.as_str(), s.votes, s.percentage))
            .collect();
        assert_eq!(summary, vec![("c1", 2, 66.7), ("c2", 1, 33.3)]);
    }

    #[rocket::async_test]
    async fn end_voting_during_registration_is_rejected() {
        let (mut election, store) = president_race().await;
        election.start_registration().await.unwrap();

        let result = election.end_voting().await;
        assert_eq!(
            rejection(result),
            Rejection::Phase {
                action: PhaseAction::EndVoting,
                phase: ElectionPhase::Registration
            }
        );
        assert_eq!(election.phase(), ElectionPhase::Registration);
        assert_eq!(
            store.get(PHASE_KEY).await.unwrap().as_deref(),
            Some("REGISTRATION")
        );
    }

    #[rocket::async_test]
    async fn registration_outside_registration_phase() {
        let (mut election, _) = president_race().await;

        // IDLE.
        assert!(election.register_voter("v1").await.is_err());
        // REGISTRATION_CLOSED.
        election.start_registration().await.unwrap();
        election.end_registration().await.unwrap();
        assert!(election.register_voter("v1").await.is_err());
        // VOTING.
        election.start_voting().await.unwrap();
        assert!(election.register_voter("v1").await.is_err());
        // ENDED.
        election.end_voting().await.unwrap();
        assert!(election.register_voter("v1").await.is_err());

        assert!(election.voters().is_empty());
    }

    #[rocket::async_test]
    async fn registration_is_idempotent() {
        let (mut election, _) = president_race().await;
        election.start_registration().await.unwrap();
        assert!(election.register_voter("v1").await.unwrap());
        assert!(!election.register_voter("v1").await.unwrap());
        assert_eq!(election.voters().to_vec(), vec!["v1".to_string()]);
    }

    #[rocket::async_test]
    async fn one_ballot_per_voter() {
        let (mut election, _) = president_race().await;
        election.start_registration().await.unwrap();
        election.register_voter("v1").await.unwrap();
        election.start_voting().await.unwrap();

        let ballot = Ballot::new().select("p1", "c1");
        election.cast_ballot("v1", &ballot).await.unwrap();
        let second = election.cast_ballot("v1", &Ballot::new().select("p1", "c2")).await;
        assert_eq!(rejection(second), Rejection::AlreadyVoted("v1".into()));

        assert_eq!(votes(&election, "c1"), 1);
        assert_eq!(votes(&election, "c2"), 0);
        assert_eq!(election.snapshot().ballots_cast, 1);
    }

    #[rocket::async_test]
    async fn unregistered_and_incomplete_ballots_change_nothing() {
        let (mut election, _) = election_with(
            &[("p1", "President"), ("p2", "Secretary"), ("p3", "Treasurer")],
            &[("c1", "p1"), ("c2", "p1"), ("c3", "p2")],
        )
        .await;
        election.start_registration().await.unwrap();
        election.register_voter("v1").await.unwrap();

        // Not yet voting.
        let full = Ballot::new().select("p1", "c1").select("p2", "c3");
        assert!(matches!(
            rejection(election.cast_ballot("v1", &full).await),
            Rejection::Phase { .. }
        ));

        election.start_voting().await.unwrap();
        assert_eq!(
            rejection(election.cast_ballot("stranger", &full).await),
            Rejection::NotRegistered("stranger".into())
        );
        let partial = Ballot::new().select("p1", "c1");
        assert!(matches!(
            rejection(election.cast_ballot("v1", &partial).await),
            Rejection::IncompleteBallot { .. }
        ));
        assert!(election.candidates().iter().all(|c| c.votes == 0));
        assert!(!election.has_voted("v1"));

        // The uncontested position needs no selection.
        election.cast_ballot("v1", &full).await.unwrap();
        assert_eq!(votes(&election, "c1"), 1);
        assert_eq!(votes(&election, "c3"), 1);
    }

    #[rocket::async_test]
    async fn tallies_match_ballots() {
        let (mut election, _) = election_with(
            &[("p1", "President"), ("p2", "Secretary")],
            &[("c1", "p1"), ("c2", "p1"), ("c3", "p2"), ("c4", "p2")],
        )
        .await;
        election.start_registration().await.unwrap();
        let voters: Vec<String> = (0..7).map(|i| format!("v{i}")).collect();
        for voter in voters.iter() {
            election.register_voter(voter).await.unwrap();
        }
        election.start_voting().await.unwrap();
        for (i, voter) in voters.iter().enumerate() {
            let ballot = Ballot::new()
                .select("p1", if i % 3 == 0 { "c1" } else { "c2" })
                .select("p2", if i % 2 == 0 { "c3" } else { "c4" });
            election.cast_ballot(voter, &ballot).await.unwrap();
            // Repeat attempts never count.
            assert!(election.cast_ballot(voter, &ballot).await.is_err());
        }

        for position in ["p1", "p2"] {
            let results = election.results(position).unwrap();
            assert_eq!(results.total_votes as usize, voters.len());
        }
        assert_eq!(votes(&election, "c1"), 3);
        assert_eq!(votes(&election, "c2"), 4);
        assert_eq!(votes(&election, "c3"), 4);
        assert_eq!(votes(&election, "c4"), 3);
    }

    #[rocket::async_test]
    async fn reset_clears_everything() {
        let (mut election, store) = president_race().await;
        election.start_registration().await.unwrap();
        election.register_voter("v1").await.unwrap();
        election.start_voting().await.unwrap();
        election
            .cast_ballot("v1", &Ballot::new().select("p1", "c2"))
            .await
            .unwrap();

        assert_eq!(
            rejection(election.reset(false).await),
            Rejection::ConfirmationRequired
        );
        assert_eq!(election.phase(), ElectionPhase::Voting);

        election.reset(true).await.unwrap();
        assert_eq!(election.phase(), ElectionPhase::Idle);
        assert!(election.voters().is_empty());
        assert!(!election.has_voted("v1"));
        assert!(election.candidates().iter().all(|c| c.votes == 0));
        assert_eq!(election.candidates().len(), 2);

        // The store agrees, with the roll and vote record gone entirely.
        assert_eq!(store.get(VOTERS_KEY).await.unwrap(), None);
        assert_eq!(store.get(HAS_VOTED_KEY).await.unwrap(), None);
        let reloaded = ElectionController::load(Arc::new(store)).await.unwrap();
        assert_eq!(reloaded.snapshot(), election.snapshot());
    }

    /// A store whose writes to one key fail while `failing` is set.
    struct FlakyStore {
        inner: MemoryStore,
        key: &'static str,
        failing: AtomicBool,
    }

    #[rocket::async_trait]
    impl StateStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: String) -> Result<()> {
            if key == self.key && self.failing.load(Ordering::SeqCst) {
                return Err(Error::Status(
                    rocket::http::Status::InternalServerError,
                    format!("write to {key} failed"),
                ));
            }
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key).await
        }
    }

    #[rocket::async_test]
    async fn failed_write_does_not_count_the_ballot() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::default(),
            key: HAS_VOTED_KEY,
            failing: AtomicBool::new(false),
        });
        let mut election = ElectionController::load(store.clone()).await.unwrap();
        election
            .add_position(PositionSpec::titled("President"))
            .await
            .unwrap();
        let position = election.positions()[0].id.clone();
        let candidate = election
            .add_candidate(CandidateSpec::new("Juma", position.clone()))
            .await
            .unwrap();
        election.start_registration().await.unwrap();
        election.register_voter("v1").await.unwrap();
        election.start_voting().await.unwrap();

        let ballot = Ballot::new().select(position, candidate.id.clone());
        store.failing.store(true, Ordering::SeqCst);
        let result = election.cast_ballot("v1", &ballot).await;
        assert_eq!(
            result.unwrap_err().status(),
            rocket::http::Status::InternalServerError
        );
        assert_eq!(votes(&election, &candidate.id), 0);
        assert!(!election.has_voted("v1"));

        // Once the store recovers the voter can still vote, exactly once.
        store.failing.store(false, Ordering::SeqCst);
        election.cast_ballot("v1", &ballot).await.unwrap();
        assert_eq!(votes(&election, &candidate.id), 1);
        assert!(election.has_voted("v1"));
    }

    #[rocket::async_test]
    async fn state_survives_reload() {
        let (mut election, store) = president_race().await;
        election.start_registration().await.unwrap();
        election.register_voter("v1").await.unwrap();
        election.register_voter("v2").await.unwrap();
        election.start_voting().await.unwrap();
        election
            .cast_ballot("v2", &Ballot::new().select("p1", "c1"))
            .await
            .unwrap();

        let reloaded = ElectionController::load(Arc::new(store)).await.unwrap();
        assert_eq!(reloaded.phase(), ElectionPhase::Voting);
        assert_eq!(reloaded.voters().to_vec(), vec!["v1".to_string(), "v2".to_string()]);
        assert!(reloaded.has_voted("v2"));
        assert!(!reloaded.has_voted("v1"));
        assert_eq!(votes(&reloaded, "c1"), 1);
    }

    #[rocket::async_test]
    async fn unknown_stored_phase_falls_back_to_idle() {
        let store = MemoryStore::default();
        store.set(PHASE_KEY, "PAUSED".into()).await.unwrap();
        let election = ElectionController::load(Arc::new(store)).await.unwrap();
        assert_eq!(election.phase(), ElectionPhase::Idle);
    }

    #[rocket::async_test]
    async fn roster_management() {
        let (mut election, _) = election_with(&[], &[]).await;

        assert!(election.add_position(PositionSpec::titled("  ")).await.is_err());
        let position = election
            .add_position(PositionSpec::titled("Sports Captain"))
            .await
            .unwrap();
        assert_eq!(position.description, "Custom Position");
        assert_eq!(position.max_votes, 1);

        // Candidates need a name and a real position.
        assert!(election
            .add_candidate(CandidateSpec::new("", position.id.clone()))
            .await
            .is_err());
        assert!(election
            .add_candidate(CandidateSpec::new("Neema", "nowhere"))
            .await
            .is_err());
        let candidate = election
            .add_candidate(CandidateSpec::new("Neema", position.id.clone()))
            .await
            .unwrap();

        // A referenced position cannot be deleted.
        assert_eq!(
            rejection(election.delete_position(&position.id).await),
            Rejection::PositionInUse(position.id.clone())
        );

        let mut edit = CandidateSpec::new("Neema Joseph", position.id.clone());
        edit.manifesto = "More football pitches".into();
        let updated = election
            .update_candidate(&candidate.id, edit)
            .await
            .unwrap();
        assert_eq!(updated.name, "Neema Joseph");
        assert_eq!(updated.id, candidate.id);

        election.delete_candidate(&candidate.id).await.unwrap();
        assert!(matches!(
            election.delete_candidate(&candidate.id).await,
            Err(Error::Status(status, _)) if status == rocket::http::Status::NotFound
        ));
        election.delete_position(&position.id).await.unwrap();
        assert!(election.positions().is_empty());
    }

    #[rocket::async_test]
    async fn roster_is_locked_once_voting_starts() {
        let (mut election, _) = president_race().await;
        election.start_registration().await.unwrap();
        election.start_voting().await.unwrap();

        assert!(matches!(
            rejection(election.add_candidate(CandidateSpec::new("Late", "p1")).await),
            Rejection::Phase {
                action: PhaseAction::EditRoster,
                ..
            }
        ));
        assert!(election.delete_candidate("c1").await.is_err());
        assert_eq!(election.candidates().len(), 2);
    }

    #[rocket::async_test]
    async fn all_results_skip_uncontested_positions() {
        let (election, _) = election_with(
            &[("p1", "President"), ("p2", "Secretary")],
            &[("c1", "p1")],
        )
        .await;
        let results = election.all_results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].position_id, "p1");
        assert!(election.results("p2").unwrap().standings.is_empty());
        assert!(election.results("p9").is_err());
    }
}
