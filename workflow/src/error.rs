//! The caller-facing error taxonomy.

use thiserror::Error;

use votegate_biometric::BiometricError;
use votegate_identity::IdentityError;
use votegate_session::{Operation, SessionError};
use votegate_store::StoreError;
use votegate_types::{SessionState, SessionToken, Timestamp};

/// Every way a workflow operation can end other than success.
///
/// All variants are terminal for the current attempt and meant to be shown
/// to the user as-is. [`AlreadyVoted`](Self::AlreadyVoted) is a confirmation,
/// not a failure; see [`is_confirmation`](Self::is_confirmation).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("password must be at least {min_len} characters long")]
    WeakCredential { min_len: usize },

    #[error("authentication failed: {0}")]
    AuthError(String),

    #[error("{operation} requires an authenticated session")]
    Unauthorized { operation: Operation },

    #[error("no face detected")]
    NoSubjectDetected,

    #[error("{count} faces detected; only one person can register")]
    AmbiguousSubject { count: usize },

    #[error("malformed face descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("{operation} is not allowed while the session is {state}")]
    PreconditionFailed {
        operation: Operation,
        state: SessionState,
    },

    #[error("you already voted")]
    AlreadyVoted { cast_at: Option<Timestamp> },

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("session {0} is closed")]
    SessionClosed(SessionToken),

    #[error("image capture failed: {0}")]
    CaptureFailed(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl WorkflowError {
    /// Whether the user may try the same operation again.
    ///
    /// Capture rejections call for a new capture; `Unavailable` may be
    /// retried as-is because the ledger write is conditional.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NoSubjectDetected
                | Self::AmbiguousSubject { .. }
                | Self::MalformedDescriptor(_)
                | Self::Unavailable(_)
        )
    }

    /// Whether this outcome should render as a confirmation ("you already
    /// voted") rather than as an error.
    pub fn is_confirmation(&self) -> bool {
        matches!(self, Self::AlreadyVoted { .. })
    }
}

impl From<SessionError> for WorkflowError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Unauthorized { operation } => Self::Unauthorized { operation },
            SessionError::PreconditionFailed { operation, state } => {
                Self::PreconditionFailed { operation, state }
            }
            SessionError::AlreadyVoted => Self::AlreadyVoted { cast_at: None },
            SessionError::SessionClosed(token) => Self::SessionClosed(token),
        }
    }
}

impl From<IdentityError> for WorkflowError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::WeakCredential { min_len } => Self::WeakCredential { min_len },
            IdentityError::Rejected(msg) => Self::AuthError(msg),
            IdentityError::Backend(msg) => Self::AuthError(format!("identity store error: {msg}")),
            IdentityError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

impl From<BiometricError> for WorkflowError {
    fn from(e: BiometricError) -> Self {
        match e {
            BiometricError::NoSubjectDetected => Self::NoSubjectDetected,
            BiometricError::AmbiguousSubject { count } => Self::AmbiguousSubject { count },
            BiometricError::MalformedDescriptor(msg) => Self::MalformedDescriptor(msg),
            BiometricError::CaptureFailed(msg) => Self::CaptureFailed(msg),
            BiometricError::Unavailable(msg) => Self::Unavailable(msg),
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => Self::Unavailable(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_capture_rejections_and_outages_are_retryable() {
        assert!(WorkflowError::NoSubjectDetected.is_retryable());
        assert!(WorkflowError::AmbiguousSubject { count: 2 }.is_retryable());
        assert!(WorkflowError::Unavailable("x".into()).is_retryable());
        assert!(!WorkflowError::AlreadyVoted { cast_at: None }.is_retryable());
        assert!(!WorkflowError::WeakCredential { min_len: 8 }.is_retryable());
        assert!(!WorkflowError::Storage("x".into()).is_retryable());
    }

    #[test]
    fn already_voted_is_a_confirmation() {
        assert!(WorkflowError::AlreadyVoted { cast_at: None }.is_confirmation());
        assert!(!WorkflowError::Unavailable("x".into()).is_confirmation());
    }

    #[test]
    fn transient_store_errors_become_unavailable() {
        let e: WorkflowError = StoreError::Unavailable("offline".into()).into();
        assert_eq!(e, WorkflowError::Unavailable("offline".into()));
        let e: WorkflowError = StoreError::Corruption("bad page".into()).into();
        assert!(matches!(e, WorkflowError::Storage(_)));
    }

    #[test]
    fn unusable_identity_response_is_not_retryable() {
        let e: WorkflowError = IdentityError::Backend("missing localId".into()).into();
        assert!(matches!(e, WorkflowError::AuthError(_)));
        assert!(!e.is_retryable());
    }

    #[test]
    fn session_guard_errors_map_one_to_one() {
        let e: WorkflowError = SessionError::Unauthorized {
            operation: Operation::RegisterBiometric,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "register_biometric requires an authenticated session"
        );
        let e: WorkflowError = SessionError::AlreadyVoted.into();
        assert_eq!(e, WorkflowError::AlreadyVoted { cast_at: None });
    }
}
