//! Journal entries and replay.
//!
//! The journal holds every accepted call in acceptance order. Replaying it
//! against a fresh election with the same authority must reproduce the
//! stored state exactly.

use serde::{Deserialize, Serialize};

use agora_election::{Election, ElectionCall};
use agora_types::{Identity, Timestamp};

use crate::tracing_spans::replay_span;
use crate::NodeError;

/// One accepted call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub accepted_at: Timestamp,
    pub call: ElectionCall,
}

impl JournalEntry {
    pub fn encode(&self) -> Result<Vec<u8>, NodeError> {
        bincode::serialize(self).map_err(|e| NodeError::Codec(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> Result<Self, NodeError> {
        bincode::deserialize(data).map_err(|e| NodeError::Codec(e.to_string()))
    }
}

/// Decode raw `(key, bytes)` pairs, checking that sequence numbers are dense
/// and agree with their keys.
pub fn decode_entries(raw: Vec<(u64, Vec<u8>)>) -> Result<Vec<JournalEntry>, NodeError> {
    raw.into_iter()
        .enumerate()
        .map(|(position, (key, bytes))| {
            let entry = JournalEntry::decode(&bytes)?;
            if entry.seq != key || key != position as u64 {
                return Err(NodeError::Codec(format!(
                    "journal entry at position {position} has key {key} and seq {}",
                    entry.seq
                )));
            }
            Ok(entry)
        })
        .collect()
}

/// Rebuild an election by applying `entries` in order to a fresh instance.
pub fn replay(authority: Identity, entries: &[JournalEntry]) -> Result<Election, NodeError> {
    let _span = replay_span(entries.len()).entered();
    let mut election = Election::new(authority);
    for entry in entries {
        election
            .apply(&entry.call)
            .map_err(|source| NodeError::Replay {
                seq: entry.seq,
                source,
            })?;
    }
    tracing::debug!(entries = entries.len(), phase = %election.phase(), "journal replayed");
    Ok(election)
}
