//! Election phases.
//!
//! The workflow is strictly linear and forward-only:
//! Registration → ProposalIntake → ProposalIntakeClosed → Balloting → BallotingClosed → Tallied

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// The phase an election instance is currently in.
///
/// Variants are declared in workflow order, so the derived `Ord` matches
/// the order in which phases are entered.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Phase {
    /// Authority admits and removes voters.
    #[default]
    Registration,
    /// Registered voters submit proposals.
    ProposalIntake,
    /// Intake is over; balloting has not started.
    ProposalIntakeClosed,
    /// Registered voters cast one ballot each.
    Balloting,
    /// Ballots are final; the tally has not run.
    BallotingClosed,
    /// The tally result is fixed.
    Tallied,
}

impl Phase {
    /// All phases in workflow order.
    pub const ALL: [Phase; 6] = [
        Phase::Registration,
        Phase::ProposalIntake,
        Phase::ProposalIntakeClosed,
        Phase::Balloting,
        Phase::BallotingClosed,
        Phase::Tallied,
    ];

    /// The phase that follows this one, or `None` for the terminal phase.
    pub fn successor(self) -> Option<Phase> {
        match self {
            Self::Registration => Some(Self::ProposalIntake),
            Self::ProposalIntake => Some(Self::ProposalIntakeClosed),
            Self::ProposalIntakeClosed => Some(Self::Balloting),
            Self::Balloting => Some(Self::BallotingClosed),
            Self::BallotingClosed => Some(Self::Tallied),
            Self::Tallied => None,
        }
    }

    /// Zero-based position in the workflow.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Whether the terminal phase has been reached.
    pub fn is_terminal(self) -> bool {
        self == Self::Tallied
    }

    /// Stable snake_case name (used in logs and metrics).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::ProposalIntake => "proposal_intake",
            Self::ProposalIntakeClosed => "proposal_intake_closed",
            Self::Balloting => "balloting",
            Self::BallotingClosed => "balloting_closed",
            Self::Tallied => "tallied",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| TypesError::UnknownPhase(s.to_string()))
    }
}
