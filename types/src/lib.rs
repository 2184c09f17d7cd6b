//! Fundamental types for the agora election ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! caller identities, the election phase enum, proposal indices and timestamps.

pub mod error;
pub mod identity;
pub mod phase;
pub mod time;

pub use error::TypesError;
pub use identity::Identity;
pub use phase::Phase;
pub use time::{Clock, SystemClock, Timestamp};

/// Position of a proposal in the append-only proposal ledger.
///
/// Index 0 is always the abstention sentinel once proposal intake has opened.
pub type ProposalIndex = u32;

/// Index of the abstention sentinel proposal.
pub const SENTINEL_INDEX: ProposalIndex = 0;
