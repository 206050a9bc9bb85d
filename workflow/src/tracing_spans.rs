//! Pre-built [`tracing::Span`] constructors for workflow operations.
//!
//! Every span carries the session token so one user's journey can be
//! followed across sign-in, registration and casting.

use tracing::{info_span, Span};

use votegate_types::{Identity, SessionToken};

/// Span covering the lifetime of one session.
pub fn session_span(token: &SessionToken) -> Span {
    info_span!("session", session = %token)
}

/// Span covering a sign-up or sign-in call.
pub fn auth_span(token: &SessionToken, operation: &str) -> Span {
    info_span!("auth", session = %token, operation = %operation)
}

/// Span covering capture, detection and descriptor storage.
pub fn register_span(token: &SessionToken, identity: &Identity) -> Span {
    info_span!("register_biometric", session = %token, identity = %identity)
}

/// Span covering the conditional ledger write.
pub fn cast_span(token: &SessionToken, identity: &Identity) -> Span {
    info_span!("cast_vote", session = %token, identity = %identity)
}
