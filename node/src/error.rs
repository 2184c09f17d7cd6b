use agora_election::ElectionError;
use agora_types::Identity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("election error: {0}")]
    Election(#[from] ElectionError),

    #[error("store error: {0}")]
    Store(#[from] agora_store::StoreError),

    #[error("config error: {0}")]
    Config(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("stored election belongs to authority {stored}, config names {configured}")]
    AuthorityMismatch {
        configured: Identity,
        stored: Identity,
    },

    #[error("journal entry {seq} could not be replayed: {source}")]
    Replay { seq: u64, source: ElectionError },

    #[error("journal does not reproduce the stored election: {0}")]
    JournalMismatch(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("logging error: {0}")]
    Logging(String),
}

impl NodeError {
    /// The core's rejection reason, if this error is a rejected call.
    pub fn as_election(&self) -> Option<&ElectionError> {
        match self {
            Self::Election(e) => Some(e),
            _ => None,
        }
    }
}
