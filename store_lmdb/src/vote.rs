//! LMDB implementation of VoteLedger.
//!
//! Keys are the raw identity bytes; values are bincode-encoded `VoteRecord`s.
//! LMDB admits one write transaction at a time, so the read-then-put inside
//! `create_if_absent` is atomic with respect to every other writer. Writes run
//! on the blocking pool so a queued writer never stalls a runtime worker.

use std::sync::Arc;

use async_trait::async_trait;
use heed::types::Bytes;
use heed::{Database, Env};

use votegate_store::{StoreError, VoteLedger};
use votegate_types::{Identity, VoteRecord};

use crate::{blocking, decode, encode, LmdbError};

#[derive(Clone)]
pub struct LmdbVoteLedger {
    pub(crate) env: Arc<Env>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
}

impl LmdbVoteLedger {
    fn read(&self, identity: &Identity) -> Result<Option<VoteRecord>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.votes_db.get(&rtxn, identity.as_bytes())? {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }

    fn insert_new(&self, record: &VoteRecord) -> Result<bool, LmdbError> {
        let key = record.identity.as_bytes();
        let value = encode(record)?;
        let mut wtxn = self.env.write_txn()?;
        if self.votes_db.get(&wtxn, key)?.is_some() {
            // Dropping the transaction aborts it.
            return Ok(false);
        }
        self.votes_db.put(&mut wtxn, key, &value)?;
        wtxn.commit()?;
        Ok(true)
    }

    /// Number of recorded votes.
    pub fn len(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.votes_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl VoteLedger for LmdbVoteLedger {
    async fn get(&self, identity: &Identity) -> Result<Option<VoteRecord>, StoreError> {
        let record = self.read(identity)?;
        if let Some(record) = &record {
            if &record.identity != identity {
                return Err(StoreError::Corruption(format!(
                    "vote stored under {identity} names {}",
                    record.identity
                )));
            }
        }
        Ok(record)
    }

    async fn create_if_absent(&self, record: &VoteRecord) -> Result<bool, StoreError> {
        let ledger = self.clone();
        let owned = record.clone();
        let created = blocking(move || ledger.insert_new(&owned)).await?;
        if created {
            tracing::debug!(identity = %record.identity, "vote record created");
        } else {
            tracing::debug!(identity = %record.identity, "vote record already present");
        }
        Ok(created)
    }
}
