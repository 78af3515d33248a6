use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Rejection;

/// Stages in the election lifecycle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElectionPhase {
    /// Nothing running; the roster may be edited.
    #[default]
    Idle,
    /// Students may add themselves to the voter roll.
    Registration,
    /// The roll is frozen, voting has not begun.
    RegistrationClosed,
    /// Registered voters may cast one ballot each.
    Voting,
    /// Voting is over and results are final.
    Ended,
}

/// Everything that is gated on the current phase.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseAction {
    StartRegistration,
    EndRegistration,
    StartVoting,
    EndVoting,
    Reset,
    RegisterVoter,
    CastBallot,
    EditRoster,
}

impl ElectionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Registration => "REGISTRATION",
            Self::RegistrationClosed => "REGISTRATION_CLOSED",
            Self::Voting => "VOTING",
            Self::Ended => "ENDED",
        }
    }

    /// The phase reached by applying `action` to this phase.
    ///
    /// Non-transition actions (registering, voting, roster edits) map a phase
    /// onto itself when they are permitted.
    pub fn transition(self, action: PhaseAction) -> Result<Self, Rejection> {
        use ElectionPhase::*;
        use PhaseAction::*;

        match (self, action) {
            (Idle, StartRegistration) => Ok(Registration),
            (Registration, EndRegistration) => Ok(RegistrationClosed),
            (Registration | RegistrationClosed, StartVoting) => Ok(Voting),
            (Voting, EndVoting) => Ok(Ended),
            (_, Reset) => Ok(Idle),
            (Registration, RegisterVoter) => Ok(Registration),
            (Voting, CastBallot) => Ok(Voting),
            (Idle | Registration | RegistrationClosed, EditRoster) => Ok(self),
            (phase, action) => Err(Rejection::Phase { action, phase }),
        }
    }

    /// Check that `action` is allowed without changing phase.
    pub fn permits(self, action: PhaseAction) -> Result<(), Rejection> {
        self.transition(action).map(|_| ())
    }
}

impl Display for ElectionPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElectionPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IDLE" => Ok(Self::Idle),
            "REGISTRATION" => Ok(Self::Registration),
            "REGISTRATION_CLOSED" => Ok(Self::RegistrationClosed),
            "VOTING" => Ok(Self::Voting),
            "ENDED" => Ok(Self::Ended),
            other => Err(format!("unknown election phase '{other}'")),
        }
    }
}

impl Display for PhaseAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::StartRegistration => "start registration",
            Self::EndRegistration => "end registration",
            Self::StartVoting => "start voting",
            Self::EndVoting => "end voting",
            Self::Reset => "reset the election",
            Self::RegisterVoter => "register voters",
            Self::CastBallot => "cast ballots",
            Self::EditRoster => "edit positions or candidates",
        };
        f.write_str(text)
    }
}
