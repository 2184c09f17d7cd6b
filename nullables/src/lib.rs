//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies of the node (clock, storage, event subscribers) are
//! abstracted behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod events;
pub mod store;

pub use clock::NullClock;
pub use events::EventRecorder;
pub use store::NullElectionStore;
