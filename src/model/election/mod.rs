use std::sync::Arc;

use rocket::tokio::sync::Mutex;

pub use ballot::Ballot;
pub use candidate::{Candidate, CandidateSpec};
pub use controller::{ElectionController, ElectionSnapshot};
pub use phase::{ElectionPhase, PhaseAction};
pub use position::{ElectionPosition, PositionSpec};
pub use results::{CandidateStanding, PositionResults};

mod ballot;
mod candidate;
mod controller;
mod phase;
mod position;
mod results;

/// Positions are identified by opaque strings, e.g. `pos1`.
pub type PositionId = String;
/// Candidates are identified by opaque strings, e.g. `cand1`.
pub type CandidateId = String;
/// Voters are identified by their student user ID.
pub type VoterId = String;

/// The election as held in managed state; every operation runs under the lock.
pub type SharedElection = Arc<Mutex<ElectionController>>;
