//! Append-only journal of accepted calls.

use crate::StoreError;

/// Stores accepted calls keyed by a dense sequence number starting at 0.
///
/// Implementations reject an append whose sequence number is not exactly
/// [`entry_count`](JournalStore::entry_count), so the journal has no gaps
/// and no overwrites.
pub trait JournalStore {
    fn append_entry(&self, seq: u64, data: &[u8]) -> Result<(), StoreError>;

    fn get_entry(&self, seq: u64) -> Result<Vec<u8>, StoreError>;

    fn entry_count(&self) -> Result<u64, StoreError>;

    /// All entries in sequence order.
    fn entries(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError>;
}
