//! Phase-gated election core.
//!
//! One election runs through a fixed, forward-only sequence of phases:
//! Registration → ProposalIntake → ProposalIntakeClosed → Balloting → BallotingClosed → Tallied
//!
//! A single authority, fixed at construction, advances phases and manages the
//! voter registry. Registered voters submit proposals and cast one ballot each.
//! Calls are expected one at a time; each either applies fully or not at all.

pub mod access;
pub mod call;
pub mod election;
pub mod error;
pub mod event;
pub mod proposal;
pub mod registry;
pub mod snapshot;
pub mod tally;
pub mod voting;
pub mod workflow;

pub use access::AccessControl;
pub use call::ElectionCall;
pub use election::Election;
pub use error::ElectionError;
pub use event::ElectionEvent;
pub use proposal::{Proposal, ProposalLedger};
pub use registry::{Voter, VoterRegistry};
pub use snapshot::ElectionSnapshot;
pub use tally::{TallyEngine, TallyOutcome, TallyResult};
pub use voting::VotingEngine;
pub use workflow::{Transition, Workflow};
