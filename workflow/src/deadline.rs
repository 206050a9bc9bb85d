//! Optional per-call deadline for collaborator calls.

use std::future::Future;
use std::time::Duration;

use crate::WorkflowError;

/// Await `call`, converting its error into a [`WorkflowError`].
///
/// With a `limit`, a call that has not finished in time is dropped and
/// reported as `Unavailable`. There is no retry here; retrying is the
/// caller's decision.
pub async fn with_deadline<T, E, F>(
    what: &'static str,
    limit: Option<Duration>,
    call: F,
) -> Result<T, WorkflowError>
where
    F: Future<Output = Result<T, E>>,
    WorkflowError: From<E>,
{
    let Some(limit) = limit else {
        return call.await.map_err(WorkflowError::from);
    };
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(WorkflowError::from),
        Err(_) => {
            tracing::warn!(call = what, ?limit, "collaborator call timed out");
            Err(WorkflowError::Unavailable(format!(
                "{what} timed out after {}ms",
                limit.as_millis()
            )))
        }
    }
}
