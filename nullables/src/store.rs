//! Nullable store: thread-safe in-memory election storage for testing.

use agora_store::{ElectionStore, JournalStore, SnapshotStore, StoreError};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    snapshot: Option<Vec<u8>>,
    journal: BTreeMap<u64, Vec<u8>>,
}

/// An in-memory election store.
///
/// Call [`fail_writes`](Self::fail_writes) to make every subsequent write
/// fail, for exercising the node's behaviour on storage errors.
#[derive(Default)]
pub struct NullElectionStore {
    inner: Mutex<Inner>,
    fail_writes: AtomicBool,
}

impl NullElectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make writes fail (`true`) or succeed again (`false`).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-write; the maps are still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null store: writes disabled".into()));
        }
        Ok(())
    }

    fn check_seq(inner: &Inner, seq: u64) -> Result<(), StoreError> {
        let expected = inner.journal.len() as u64;
        if seq != expected {
            return Err(StoreError::SequenceGap { expected, got: seq });
        }
        Ok(())
    }
}

impl SnapshotStore for NullElectionStore {
    fn put_snapshot(&self, data: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        self.lock().snapshot = Some(data.to_vec());
        Ok(())
    }

    fn get_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock().snapshot.clone())
    }
}

impl JournalStore for NullElectionStore {
    fn append_entry(&self, seq: u64, data: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut inner = self.lock();
        Self::check_seq(&inner, seq)?;
        inner.journal.insert(seq, data.to_vec());
        Ok(())
    }

    fn get_entry(&self, seq: u64) -> Result<Vec<u8>, StoreError> {
        self.lock()
            .journal
            .get(&seq)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("journal entry {seq}")))
    }

    fn entry_count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().journal.len() as u64)
    }

    fn entries(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        Ok(self
            .lock()
            .journal
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect())
    }
}

impl ElectionStore for NullElectionStore {
    fn commit(&self, seq: u64, entry: &[u8], snapshot: &[u8]) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut inner = self.lock();
        Self::check_seq(&inner, seq)?;
        inner.journal.insert(seq, entry.to_vec());
        inner.snapshot = Some(snapshot.to_vec());
        Ok(())
    }
}
