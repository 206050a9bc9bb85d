//! Vote records and receipts.

use serde::{Deserialize, Serialize};

use crate::{Identity, Timestamp};

/// The durable record of one identity's vote.
///
/// At most one exists per identity. Once written with `cast = true` it is
/// never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub identity: Identity,
    pub cast: bool,
    pub timestamp: Timestamp,
}

impl VoteRecord {
    /// A cast vote for `identity` at `timestamp`.
    pub fn cast(identity: Identity, timestamp: Timestamp) -> Self {
        Self {
            identity,
            cast: true,
            timestamp,
        }
    }

    pub fn receipt(&self) -> Receipt {
        Receipt {
            identity: self.identity.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Proof handed back to the caller after a vote is freshly recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub identity: Identity,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_mirrors_record() {
        let id = Identity::new("uid-1").unwrap();
        let record = VoteRecord::cast(id.clone(), Timestamp::from_millis(77));
        assert!(record.cast);
        let receipt = record.receipt();
        assert_eq!(receipt.identity, id);
        assert_eq!(receipt.timestamp, Timestamp::from_millis(77));
    }
}
