//! LMDB storage backend for the agora election ledger.
//!
//! Implements the `agora-store` traits using the `heed` LMDB bindings.
//! One environment holds two databases: the current snapshot and the journal.

pub mod election;
pub mod environment;
pub mod error;

pub use election::LmdbElectionStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
