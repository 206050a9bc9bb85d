//! Vote casting: the conditional, idempotent ledger write.

use std::sync::Arc;
use std::time::Duration;

use votegate_store::VoteLedger;
use votegate_types::{Clock, Identity, Receipt, VoteRecord};

use crate::deadline::with_deadline;
use crate::WorkflowError;

/// Writes an identity's vote to the ledger at most once.
///
/// The write is "create if absent", never a blind overwrite, so a request
/// retried after a timeout observes the existing record instead of creating
/// a second one. Session guards are not checked here; callers go through
/// [`VotingWorkflow::cast_vote`](crate::VotingWorkflow::cast_vote).
pub struct VoteCastingService {
    ledger: Arc<dyn VoteLedger>,
    clock: Arc<dyn Clock>,
    deadline: Option<Duration>,
}

impl VoteCastingService {
    pub fn new(ledger: Arc<dyn VoteLedger>, clock: Arc<dyn Clock>, deadline: Option<Duration>) -> Self {
        Self {
            ledger,
            clock,
            deadline,
        }
    }

    /// Record `identity`'s vote.
    ///
    /// Returns a [`Receipt`] when this call created the record, and
    /// [`WorkflowError::AlreadyVoted`] when a record already existed. Any
    /// other error means nothing is known to have been written.
    pub async fn cast_vote(&self, identity: &Identity) -> Result<Receipt, WorkflowError> {
        let record = VoteRecord::cast(identity.clone(), self.clock.now());

        let created = with_deadline(
            "vote ledger write",
            self.deadline,
            self.ledger.create_if_absent(&record),
        )
        .await?;

        if created {
            tracing::info!(%identity, timestamp = %record.timestamp, "vote recorded");
            return Ok(record.receipt());
        }

        // The conflict is the answer; reading the existing record back only
        // enriches the confirmation, so a failed read is not an error.
        let cast_at = match with_deadline("vote ledger read", self.deadline, self.ledger.get(identity)).await {
            Ok(existing) => existing.map(|r| r.timestamp),
            Err(e) => {
                tracing::warn!(%identity, error = %e, "could not read existing vote record");
                None
            }
        };
        tracing::info!(%identity, "vote already recorded; no write performed");
        Err(WorkflowError::AlreadyVoted { cast_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votegate_nullables::{NullClock, NullVoteLedger};
    use votegate_types::Timestamp;

    fn service(ledger: Arc<NullVoteLedger>, clock: Arc<NullClock>) -> VoteCastingService {
        VoteCastingService::new(ledger, clock, None)
    }

    #[tokio::test]
    async fn first_cast_returns_receipt_with_clock_time() {
        let ledger = Arc::new(NullVoteLedger::new());
        let clock = Arc::new(NullClock::new(1_700_000_000_000));
        let svc = service(Arc::clone(&ledger), clock);
        let id = Identity::new("uid-1").unwrap();

        let receipt = svc.cast_vote(&id).await.unwrap();
        assert_eq!(receipt.identity, id);
        assert_eq!(receipt.timestamp, Timestamp::from_millis(1_700_000_000_000));
        assert_eq!(ledger.count_for(&id), 1);
    }

    #[tokio::test]
    async fn second_cast_reports_first_timestamp() {
        let ledger = Arc::new(NullVoteLedger::new());
        let clock = Arc::new(NullClock::new(100));
        let svc = service(Arc::clone(&ledger), Arc::clone(&clock));
        let id = Identity::new("uid-1").unwrap();

        svc.cast_vote(&id).await.unwrap();
        clock.advance(5_000);
        let err = svc.cast_vote(&id).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::AlreadyVoted {
                cast_at: Some(Timestamp::from_millis(100))
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn outage_surfaces_unavailable_and_writes_nothing() {
        let ledger = Arc::new(NullVoteLedger::new());
        ledger.set_unavailable(true);
        let svc = service(Arc::clone(&ledger), Arc::new(NullClock::new(0)));
        let id = Identity::new("uid-1").unwrap();

        let err = svc.cast_vote(&id).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Unavailable(_)));
        assert!(ledger.is_empty());

        ledger.set_unavailable(false);
        assert!(svc.cast_vote(&id).await.is_ok());
    }
}
