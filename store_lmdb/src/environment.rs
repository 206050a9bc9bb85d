//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::{LmdbDescriptorStore, LmdbError, LmdbVoteLedger};

/// The schema version that the current code writes and expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

const VOTES_DB: &str = "votes";
const DESCRIPTORS_DB: &str = "descriptors";
const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    votes_db: Database<Bytes, Bytes>,
    descriptors_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in the directory `path`.
    ///
    /// `map_size` is the maximum size of the memory map in bytes and must be
    /// a multiple of the OS page size.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path and
        // the memory map is never accessed outside heed's transaction API.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(3)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let votes_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(VOTES_DB))?;
        let descriptors_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(DESCRIPTORS_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;

        let stored = match meta_db.get(&wtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Corruption("schema_version has unexpected byte length".into())
                })?;
                u32::from_le_bytes(arr)
            }
            None => 0,
        };
        if stored > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::SchemaTooNew {
                found: stored,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        if stored < CURRENT_SCHEMA_VERSION {
            meta_db.put(
                &mut wtxn,
                SCHEMA_VERSION_KEY,
                &CURRENT_SCHEMA_VERSION.to_le_bytes(),
            )?;
            tracing::info!(
                from = stored,
                to = CURRENT_SCHEMA_VERSION,
                path = %path.display(),
                "stamped ledger schema version"
            );
        }
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            votes_db,
            descriptors_db,
        })
    }

    pub fn vote_ledger(&self) -> LmdbVoteLedger {
        LmdbVoteLedger {
            env: Arc::clone(&self.env),
            votes_db: self.votes_db,
        }
    }

    pub fn descriptor_store(&self) -> LmdbDescriptorStore {
        LmdbDescriptorStore {
            env: Arc::clone(&self.env),
            descriptors_db: self.descriptors_db,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_directory_and_stamps_version() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("ledger");
        {
            let _env = LmdbEnvironment::open(&path, 16 * 1024 * 1024).expect("open env");
        }
        assert!(path.exists());
        // Reopening an already stamped environment is a no-op.
        LmdbEnvironment::open(&path, 16 * 1024 * 1024).expect("reopen env");
    }
}
