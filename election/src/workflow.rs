//! The phase state machine.
//!
//! Each phase-advancing operation is legal from exactly one predecessor and
//! moves the election exactly one step forward. Nothing moves it back.

use agora_types::Phase;
use serde::{Deserialize, Serialize};

use crate::error::ElectionError;
use crate::event::ElectionEvent;

/// A phase-advancing operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    OpenProposalIntake,
    CloseProposalIntake,
    OpenBalloting,
    CloseBalloting,
    Tally,
}

impl Transition {
    /// The only phase this transition may start from.
    pub fn source(self) -> Phase {
        match self {
            Self::OpenProposalIntake => Phase::Registration,
            Self::CloseProposalIntake => Phase::ProposalIntake,
            Self::OpenBalloting => Phase::ProposalIntakeClosed,
            Self::CloseBalloting => Phase::Balloting,
            Self::Tally => Phase::BallotingClosed,
        }
    }

    /// The phase this transition lands in.
    pub fn target(self) -> Phase {
        match self {
            Self::OpenProposalIntake => Phase::ProposalIntake,
            Self::CloseProposalIntake => Phase::ProposalIntakeClosed,
            Self::OpenBalloting => Phase::Balloting,
            Self::CloseBalloting => Phase::BallotingClosed,
            Self::Tally => Phase::Tallied,
        }
    }
}

/// Holds the current phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workflow {
    phase: Phase,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a workflow at a known phase (snapshot loading).
    pub(crate) fn at(phase: Phase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fail with `InvalidPhase` unless the election is in `required`.
    pub fn require(&self, required: Phase) -> Result<(), ElectionError> {
        if self.phase != required {
            return Err(ElectionError::InvalidPhase {
                required,
                current: self.phase,
            });
        }
        Ok(())
    }

    /// Perform `transition`, returning the `PhaseChanged` notification.
    ///
    /// Callers run their own checks between `require` and `advance`; this
    /// re-checks the predecessor so a misuse can never skip a phase.
    pub fn advance(&mut self, transition: Transition) -> Result<ElectionEvent, ElectionError> {
        self.require(transition.source())?;
        let from = self.phase;
        self.phase = transition.target();
        debug_assert_eq!(from.successor(), Some(self.phase));
        tracing::info!(from = %from, to = %self.phase, "election phase changed");
        Ok(ElectionEvent::PhaseChanged {
            from,
            to: self.phase,
        })
    }
}
