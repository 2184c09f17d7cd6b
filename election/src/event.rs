//! Notifications emitted by accepted calls.

use agora_types::{Identity, Phase, ProposalIndex};
use serde::{Deserialize, Serialize};

/// A notification produced by a successful mutating call, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionEvent {
    VoterRegistered(Identity),
    VoterUnregistered(Identity),
    PhaseChanged { from: Phase, to: Phase },
    ProposalRegistered(ProposalIndex),
    Voted { voter: Identity, proposal: ProposalIndex },
    /// More than one proposal shares the winning vote count.
    ProposalTie(Vec<ProposalIndex>),
}

impl ElectionEvent {
    /// Stable snake_case name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VoterRegistered(_) => "voter_registered",
            Self::VoterUnregistered(_) => "voter_unregistered",
            Self::PhaseChanged { .. } => "phase_changed",
            Self::ProposalRegistered(_) => "proposal_registered",
            Self::Voted { .. } => "voted",
            Self::ProposalTie(_) => "proposal_tie",
        }
    }
}
