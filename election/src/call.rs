//! Mutating calls as data, for journaling and replay.

use agora_types::{Identity, ProposalIndex};
use serde::{Deserialize, Serialize};

/// One externally ordered call against an election.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionCall {
    RegisterVoter {
        caller: Identity,
        voter: Identity,
    },
    RegisterVoters {
        caller: Identity,
        voters: Vec<Identity>,
    },
    UnregisterVoter {
        caller: Identity,
        voter: Identity,
    },
    OpenProposalIntake {
        caller: Identity,
    },
    CloseProposalIntake {
        caller: Identity,
    },
    OpenBalloting {
        caller: Identity,
    },
    CloseBalloting {
        caller: Identity,
    },
    Tally {
        caller: Identity,
    },
    SubmitProposal {
        caller: Identity,
        description: String,
    },
    Vote {
        caller: Identity,
        proposal: ProposalIndex,
    },
}

impl ElectionCall {
    /// Stable operation name for spans and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterVoter { .. } => "register_voter",
            Self::RegisterVoters { .. } => "register_voters",
            Self::UnregisterVoter { .. } => "unregister_voter",
            Self::OpenProposalIntake { .. } => "open_proposal_intake",
            Self::CloseProposalIntake { .. } => "close_proposal_intake",
            Self::OpenBalloting { .. } => "open_balloting",
            Self::CloseBalloting { .. } => "close_balloting",
            Self::Tally { .. } => "tally",
            Self::SubmitProposal { .. } => "submit_proposal",
            Self::Vote { .. } => "vote",
        }
    }

    pub fn caller(&self) -> &Identity {
        match self {
            Self::RegisterVoter { caller, .. }
            | Self::RegisterVoters { caller, .. }
            | Self::UnregisterVoter { caller, .. }
            | Self::OpenProposalIntake { caller }
            | Self::CloseProposalIntake { caller }
            | Self::OpenBalloting { caller }
            | Self::CloseBalloting { caller }
            | Self::Tally { caller }
            | Self::SubmitProposal { caller, .. }
            | Self::Vote { caller, .. } => caller,
        }
    }
}
