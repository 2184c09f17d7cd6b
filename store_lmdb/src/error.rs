use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(#[from] heed::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("journal gap: expected sequence {expected}, got {got}")]
    SequenceGap { expected: u64, got: u64 },
}

impl From<LmdbError> for agora_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(key) => agora_store::StoreError::NotFound(key),
            LmdbError::SequenceGap { expected, got } => {
                agora_store::StoreError::SequenceGap { expected, got }
            }
            other => agora_store::StoreError::Backend(other.to_string()),
        }
    }
}
