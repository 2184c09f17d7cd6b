//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::election::LmdbElectionStore;
use crate::LmdbError;

const SNAPSHOT_DB: &str = "snapshot";
const JOURNAL_DB: &str = "journal";
const MAX_DBS: u32 = 2;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Env,
    snapshot_db: Database<Bytes, Bytes>,
    journal_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        // SAFETY: the node opens each data directory once per process and
        // never mutates the memory map outside heed.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let snapshot_db = env.create_database(&mut wtxn, Some(SNAPSHOT_DB))?;
        let journal_db = env.create_database(&mut wtxn, Some(JOURNAL_DB))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");
        Ok(Self {
            env,
            snapshot_db,
            journal_db,
        })
    }

    /// A store handle over this environment's databases.
    pub fn election_store(&self) -> LmdbElectionStore {
        LmdbElectionStore {
            env: self.env.clone(),
            snapshot_db: self.snapshot_db,
            journal_db: self.journal_db,
        }
    }
}
