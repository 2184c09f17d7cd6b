use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("journal gap: expected sequence {expected}, got {got}")]
    SequenceGap { expected: u64, got: u64 },

    #[error("storage backend error: {0}")]
    Backend(String),
}
