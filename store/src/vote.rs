//! Vote ledger trait.

use async_trait::async_trait;
use votegate_types::{Identity, VoteRecord};

use crate::StoreError;

/// Durable identity → vote record map.
///
/// The ledger has exactly one mutation path, [`create_if_absent`], and no
/// update or delete. Implementations must make that call atomic with respect
/// to concurrent writers for the same identity: when several callers race,
/// exactly one observes `true`.
///
/// [`create_if_absent`]: VoteLedger::create_if_absent
#[async_trait]
pub trait VoteLedger: Send + Sync {
    /// Read the record for `identity`, if one exists.
    async fn get(&self, identity: &Identity) -> Result<Option<VoteRecord>, StoreError>;

    /// Store `record` under `record.identity` only if no record exists yet.
    ///
    /// Returns `true` if this call created the record, `false` if a record
    /// was already present (the existing record is left untouched).
    async fn create_if_absent(&self, record: &VoteRecord) -> Result<bool, StoreError>;
}
