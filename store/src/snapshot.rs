//! Snapshot storage trait.

use crate::StoreError;

/// Stores the latest serialized election state.
pub trait SnapshotStore {
    /// Replace the stored snapshot.
    fn put_snapshot(&self, data: &[u8]) -> Result<(), StoreError>;

    /// The stored snapshot, or `None` for a fresh store.
    fn get_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError>;
}
