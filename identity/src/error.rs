use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Rejected locally; the identity store was never contacted.
    #[error("password must be at least {min_len} characters long")]
    WeakCredential { min_len: usize },

    /// The identity store refused the credential (unknown user, wrong
    /// password, email already registered, ...).
    #[error("authentication failed: {0}")]
    Rejected(String),

    /// The identity store answered with something unusable (malformed
    /// response, misconfigured client). Retrying will not help.
    #[error("identity store error: {0}")]
    Backend(String),

    /// The identity store could not be reached.
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}
