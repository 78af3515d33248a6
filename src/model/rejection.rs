use rocket::http::Status;
use thiserror::Error;

use super::election::{CandidateId, ElectionPhase, PhaseAction, PositionId, VoterId};
use super::learning::{QuizAction, QuizStatus};

/// An operation refused by a lifecycle rule. A rejected operation leaves all
/// state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cannot {action} while the election is {phase}")]
    Phase {
        action: PhaseAction,
        phase: ElectionPhase,
    },
    #[error("voter '{0}' is not on the voter roll")]
    NotRegistered(VoterId),
    #[error("voter '{0}' has already voted")]
    AlreadyVoted(VoterId),
    #[error("ballot is missing a selection for: {}", .missing.join(", "))]
    IncompleteBallot { missing: Vec<PositionId> },
    #[error("candidate '{candidate_id}' is not standing for position '{position_id}'")]
    InvalidSelection {
        position_id: PositionId,
        candidate_id: CandidateId,
    },
    #[error("position '{0}' still has candidates")]
    PositionInUse(PositionId),
    #[error("cannot {action} a quiz that is {status}")]
    Quiz { action: QuizAction, status: QuizStatus },
    #[error("this operation is destructive and must be confirmed")]
    ConfirmationRequired,
}

impl Rejection {
    pub fn status(&self) -> Status {
        match self {
            Self::Phase { .. } | Self::Quiz { .. } => Status::Conflict,
            Self::AlreadyVoted(_) | Self::PositionInUse(_) => Status::Conflict,
            Self::NotRegistered(_) => Status::Forbidden,
            Self::IncompleteBallot { .. } => Status::UnprocessableEntity,
            Self::InvalidSelection { .. } => Status::BadRequest,
            Self::ConfirmationRequired => Status::PreconditionRequired,
        }
    }
}
