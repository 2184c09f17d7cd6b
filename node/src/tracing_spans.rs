//! Pre-built [`tracing::Span`] constructors for node operations.
//!
//! Consistent span names and fields make it easy to filter and correlate
//! every log line belonging to one call.

use tracing::{info_span, Span};

/// Span covering the application of a single call.
pub fn call_span(op: &str, caller: &str) -> Span {
    info_span!("call", op = %op, caller = %caller)
}

/// Span covering a journal replay.
pub fn replay_span(entries: usize) -> Span {
    info_span!("replay", entries = entries)
}
