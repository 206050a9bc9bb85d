//! The per-session workflow state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session stands in the sign-in → register → vote sequence.
///
/// Variants are declared in workflow order; the derived `Ord` follows it, so
/// a transition is forward exactly when the target compares greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Fresh session; nothing but sign-up / sign-in is allowed.
    Unauthenticated,
    /// Credentials accepted; a biometric must be registered before voting.
    Authenticated,
    /// Exactly one face descriptor is durably bound to the identity.
    BiometricRegistered,
    /// The identity's vote is recorded in the ledger.
    VoteCast,
}

impl SessionState {
    /// Whether a biometric registration may be attempted.
    pub fn can_register(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }

    /// Whether a vote may be attempted.
    pub fn can_vote(&self) -> bool {
        matches!(self, Self::BiometricRegistered)
    }

    /// Whether sign-up / sign-in may be attempted.
    pub fn can_authenticate(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::BiometricRegistered => "biometric_registered",
            Self::VoteCast => "vote_cast",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_workflow() {
        assert!(SessionState::Unauthenticated < SessionState::Authenticated);
        assert!(SessionState::Authenticated < SessionState::BiometricRegistered);
        assert!(SessionState::BiometricRegistered < SessionState::VoteCast);
    }

    #[test]
    fn only_registered_can_vote() {
        assert!(!SessionState::Unauthenticated.can_vote());
        assert!(!SessionState::Authenticated.can_vote());
        assert!(SessionState::BiometricRegistered.can_vote());
        assert!(!SessionState::VoteCast.can_vote());
    }

    #[test]
    fn registration_requires_authentication() {
        assert!(!SessionState::Unauthenticated.can_register());
        assert!(SessionState::Authenticated.can_register());
        assert!(SessionState::VoteCast.can_register());
    }
}
