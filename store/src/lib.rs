//! Abstract storage traits for the agora election ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The node depends only on the traits.
//!
//! Values are opaque bytes; encoding belongs to the layer that owns the type.

pub mod error;
pub mod journal;
pub mod snapshot;

pub use error::StoreError;
pub use journal::JournalStore;
pub use snapshot::SnapshotStore;

/// Everything a node needs to persist one election.
pub trait ElectionStore: SnapshotStore + JournalStore + Send + Sync {
    /// Append journal entry `seq` and replace the snapshot in one atomic write.
    ///
    /// Either both are stored or neither is.
    fn commit(&self, seq: u64, entry: &[u8], snapshot: &[u8]) -> Result<(), StoreError>;
}

// Shared handles: lets a caller keep access to a store it hands to a node.

impl<T: SnapshotStore + ?Sized> SnapshotStore for std::sync::Arc<T> {
    fn put_snapshot(&self, data: &[u8]) -> Result<(), StoreError> {
        (**self).put_snapshot(data)
    }

    fn get_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_snapshot()
    }
}

impl<T: JournalStore + ?Sized> JournalStore for std::sync::Arc<T> {
    fn append_entry(&self, seq: u64, data: &[u8]) -> Result<(), StoreError> {
        (**self).append_entry(seq, data)
    }

    fn get_entry(&self, seq: u64) -> Result<Vec<u8>, StoreError> {
        (**self).get_entry(seq)
    }

    fn entry_count(&self) -> Result<u64, StoreError> {
        (**self).entry_count()
    }

    fn entries(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        (**self).entries()
    }
}

impl<T: ElectionStore + ?Sized> ElectionStore for std::sync::Arc<T> {
    fn commit(&self, seq: u64, entry: &[u8], snapshot: &[u8]) -> Result<(), StoreError> {
        (**self).commit(seq, entry, snapshot)
    }
}
