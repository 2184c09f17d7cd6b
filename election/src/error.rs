use agora_types::{Identity, Phase, ProposalIndex};
use thiserror::Error;

/// Why a call was rejected. A rejected call never changes election state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElectionError {
    #[error("caller {0} is not permitted to perform this operation")]
    Unauthorized(Identity),

    #[error("operation requires phase {required}, election is in {current}")]
    InvalidPhase { required: Phase, current: Phase },

    #[error("voter {0} is already registered")]
    AlreadyRegistered(Identity),

    #[error("voter {0} is not registered")]
    NotRegistered(Identity),

    #[error("voter {0} has already voted")]
    AlreadyVoted(Identity),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalIndex),

    #[error("proposal description must not be empty")]
    EmptyDescription,

    #[error("cannot close proposal intake: no proposals submitted")]
    NoProposals,

    #[error("election has not been tallied yet")]
    NotTalliedYet,

    #[error("corrupt election snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("failed to encode election snapshot: {0}")]
    SnapshotEncode(String),
}

impl ElectionError {
    /// Stable snake_case kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::InvalidPhase { .. } => "invalid_phase",
            Self::AlreadyRegistered(_) => "already_registered",
            Self::NotRegistered(_) => "not_registered",
            Self::AlreadyVoted(_) => "already_voted",
            Self::ProposalNotFound(_) => "proposal_not_found",
            Self::EmptyDescription => "empty_description",
            Self::NoProposals => "no_proposals",
            Self::NotTalliedYet => "not_tallied_yet",
            Self::CorruptSnapshot(_) => "corrupt_snapshot",
            Self::SnapshotEncode(_) => "snapshot_encode",
        }
    }
}
