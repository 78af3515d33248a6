use rocket::{http::Status, serde::json::Json, Route, State};
use serde::Serialize;

use crate::error::Result;
use crate::model::election::{
    Ballot, Candidate, CandidateSpec, CandidateStanding, ElectionPhase, ElectionPosition,
    ElectionSnapshot, PositionResults, PositionSpec, SharedElection,
};

pub fn routes() -> Vec<Route> {
    routes![
        election,
        start_registration,
        end_registration,
        start_voting,
        end_voting,
        reset,
        add_position,
        delete_position,
        add_candidate,
        update_candidate,
        delete_candidate,
        register_voter,
        cast_ballot,
        all_results,
        position_results,
    ]
}

/// A position's results, naming the winner once the election has ended.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultsDescription {
    #[serde(flatten)]
    results: PositionResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    winner: Option<CandidateStanding>,
}

impl ResultsDescription {
    fn new(results: PositionResults, phase: ElectionPhase) -> Self {
        let winner = match phase {
            ElectionPhase::Ended => results.leader().cloned(),
            _ => None,
        };
        Self { results, winner }
    }
}

#[get("/election")]
async fn election(election: &State<SharedElection>) -> Json<ElectionSnapshot> {
    Json(election.lock().await.snapshot())
}

#[post("/election/registration/start")]
async fn start_registration(election: &State<SharedElection>) -> Result<Json<ElectionPhase>> {
    Ok(Json(election.lock().await.start_registration().await?))
}

#[post("/election/registration/end")]
async fn end_registration(election: &State<SharedElection>) -> Result<Json<ElectionPhase>> {
    Ok(Json(election.lock().await.end_registration().await?))
}

#[post("/election/voting/start")]
async fn start_voting(election: &State<SharedElection>) -> Result<Json<ElectionPhase>> {
    Ok(Json(election.lock().await.start_voting().await?))
}

#[post("/election/voting/end")]
async fn end_voting(election: &State<SharedElection>) -> Result<Json<ElectionPhase>> {
    Ok(Json(election.lock().await.end_voting().await?))
}

/// Wipe the roll and the votes. Must be called with `?confirm=true`.
#[post("/election/reset?<confirm>")]
async fn reset(confirm: Option<bool>, election: &State<SharedElection>) -> Result<()> {
    election.lock().await.reset(confirm.unwrap_or(false)).await
}

#[post("/election/positions", data = "<spec>", format = "json")]
async fn add_position(
    spec: Json<PositionSpec>,
    election: &State<SharedElection>,
) -> Result<Json<ElectionPosition>> {
    Ok(Json(election.lock().await.add_position(spec.0).await?))
}

#[delete("/election/positions/<position_id>")]
async fn delete_position(position_id: &str, election: &State<SharedElection>) -> Result<()> {
    election.lock().await.delete_position(position_id).await
}

#[post("/election/candidates", data = "<spec>", format = "json")]
async fn add_candidate(
    spec: Json<CandidateSpec>,
    election: &State<SharedElection>,
) -> Result<Json<Candidate>> {
    Ok(Json(election.lock().await.add_candidate(spec.0).await?))
}

#[put("/election/candidates/<candidate_id>", data = "<spec>", format = "json")]
async fn update_candidate(
    candidate_id: &str,
    spec: Json<CandidateSpec>,
    election: &State<SharedElection>,
) -> Result<Json<Candidate>> {
    let mut election = election.lock().await;
    Ok(Json(election.update_candidate(candidate_id, spec.0).await?))
}

#[delete("/election/candidates/<candidate_id>")]
async fn delete_candidate(candidate_id: &str, election: &State<SharedElection>) -> Result<()> {
    election.lock().await.delete_candidate(candidate_id).await
}

/// Created for a new registration, OK if the voter was already on the roll.
#[post("/election/voters/<voter_id>")]
async fn register_voter(voter_id: &str, election: &State<SharedElection>) -> Result<Status> {
    let added = election.lock().await.register_voter(voter_id).await?;
    Ok(if added { Status::Created } else { Status::Ok })
}

#[post("/election/ballots/<voter_id>", data = "<ballot>", format = "json")]
async fn cast_ballot(
    voter_id: &str,
    ballot: Json<Ballot>,
    election: &State<SharedElection>,
) -> Result<()> {
    election.lock().await.cast_ballot(voter_id, &ballot).await
}

#[get("/election/results")]
async fn all_results(election: &State<SharedElection>) -> Json<Vec<ResultsDescription>> {
    let election = election.lock().await;
    let phase = election.phase();
    let results = election
        .all_results()
        .into_iter()
        .map(|results| ResultsDescription::new(results, phase))
        .collect();
    Json(results)
}

#[get("/election/results/<position_id>")]
async fn position_results(
    position_id: &str,
    election: &State<SharedElection>,
) -> Result<Json<ResultsDescription>> {
    let election = election.lock().await;
    let results = election.results(position_id)?;
    Ok(Json(ResultsDescription::new(results, election.phase())))
}
