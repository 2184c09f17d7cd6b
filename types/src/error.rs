//! Errors raised while parsing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("unknown phase: {0}")]
    UnknownPhase(String),
}
