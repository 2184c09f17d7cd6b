//! agora election node.
//!
//! Wraps one [`Election`](agora_election::Election) and provides what the
//! core deliberately leaves out:
//! - A single serialization point for mutating calls
//! - Durable snapshot + append-only journal of accepted calls
//! - Recovery and journal replay on open
//! - Event fan-out, Prometheus metrics and structured logging

pub mod config;
pub mod error;
pub mod event_bus;
pub mod journal;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod tracing_spans;

pub use config::NodeConfig;
pub use error::NodeError;
pub use event_bus::EventBus;
pub use journal::{replay, JournalEntry};
pub use logging::{init_logging, LogFormat};
pub use metrics::ElectionMetrics;
pub use node::ElectionNode;
