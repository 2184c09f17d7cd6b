//! LMDB implementation of the election store traits.

use heed::types::Bytes;
use heed::{Database, Env, RwTxn};

use agora_store::{ElectionStore, JournalStore, SnapshotStore, StoreError};

use crate::LmdbError;

const SNAPSHOT_KEY: &[u8] = b"current";

/// Journal keys are big-endian so LMDB's byte order is sequence order.
fn seq_key(seq: u64) -> [u8; 8] {
    seq.to_be_bytes()
}

#[derive(Clone)]
pub struct LmdbElectionStore {
    pub(crate) env: Env,
    pub(crate) snapshot_db: Database<Bytes, Bytes>,
    pub(crate) journal_db: Database<Bytes, Bytes>,
}

impl LmdbElectionStore {
    fn append_in(&self, wtxn: &mut RwTxn, seq: u64, data: &[u8]) -> Result<(), LmdbError> {
        let expected = self.journal_db.len(wtxn)?;
        if seq != expected {
            return Err(LmdbError::SequenceGap { expected, got: seq });
        }
        self.journal_db.put(wtxn, &seq_key(seq), data)?;
        Ok(())
    }
}

impl SnapshotStore for LmdbElectionStore {
    fn put_snapshot(&self, data: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.snapshot_db
            .put(&mut wtxn, SNAPSHOT_KEY, data)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_snapshot(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .snapshot_db
            .get(&rtxn, SNAPSHOT_KEY)
            .map_err(LmdbError::from)?;
        Ok(val.map(<[u8]>::to_vec))
    }
}

impl JournalStore for LmdbElectionStore {
    fn append_entry(&self, seq: u64, data: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.append_in(&mut wtxn, seq, data)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_entry(&self, seq: u64) -> Result<Vec<u8>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .journal_db
            .get(&rtxn, &seq_key(seq))
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("journal entry {seq}")))?;
        Ok(val.to_vec())
    }

    fn entry_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.journal_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn entries(&self) -> Result<Vec<(u64, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut out = Vec::new();
        for item in self.journal_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, value) = item.map_err(LmdbError::from)?;
            let seq: [u8; 8] = key.try_into().map_err(|_| {
                StoreError::Backend(format!("journal key has length {}", key.len()))
            })?;
            out.push((u64::from_be_bytes(seq), value.to_vec()));
        }
        Ok(out)
    }
}

impl ElectionStore for LmdbElectionStore {
    fn commit(&self, seq: u64, entry: &[u8], snapshot: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.append_in(&mut wtxn, seq, entry)?;
        self.snapshot_db
            .put(&mut wtxn, SNAPSHOT_KEY, snapshot)
            .map_err(LmdbError::from)?;
        // Dropping `wtxn` on any error above aborts both writes.
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
