//! Registry of live sessions, keyed by token.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use votegate_types::{SessionState, SessionToken};

use crate::{SessionError, VotingSession};

/// All live sessions of one process.
///
/// Sessions are independent; the lock only protects the map and is never
/// held across a remote call. A token that is not in the map belongs to a
/// session that was logged out (or never existed), and any completion
/// carrying it is discarded with [`SessionError::SessionClosed`].
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionToken, VotingSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionToken, VotingSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a fresh, unauthenticated session.
    pub fn open(&self) -> SessionToken {
        let token = SessionToken::generate();
        self.lock().insert(token, VotingSession::new(token));
        token
    }

    /// Destroy a session. Returns `false` if it was already gone.
    pub fn close(&self, token: &SessionToken) -> bool {
        self.lock().remove(token).is_some()
    }

    pub fn state(&self, token: &SessionToken) -> Option<SessionState> {
        self.lock().get(token).map(VotingSession::state)
    }

    pub fn is_live(&self, token: &SessionToken) -> bool {
        self.lock().contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against the live session for `token`.
    pub fn with_session<R>(
        &self,
        token: &SessionToken,
        f: impl FnOnce(&mut VotingSession) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(token)
            .ok_or(SessionError::SessionClosed(*token))?;
        f(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Operation;
    use votegate_types::Identity;

    #[test]
    fn open_starts_unauthenticated() {
        let registry = SessionRegistry::new();
        let token = registry.open();
        assert_eq!(registry.state(&token), Some(SessionState::Unauthenticated));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn closed_session_rejects_completions() {
        let registry = SessionRegistry::new();
        let token = registry.open();
        assert!(registry.close(&token));
        assert!(!registry.close(&token));

        let result = registry.with_session(&token, |s| {
            s.complete_authentication(Operation::SignIn, Identity::new("uid-1").unwrap())
        });
        assert_eq!(result, Err(SessionError::SessionClosed(token)));
        assert_eq!(registry.state(&token), None);
    }

    #[test]
    fn sessions_are_independent() {
        let registry = SessionRegistry::new();
        let a = registry.open();
        let b = registry.open();
        registry
            .with_session(&a, |s| {
                s.complete_authentication(Operation::SignUp, Identity::new("uid-a").unwrap())
            })
            .unwrap();
        assert_eq!(registry.state(&a), Some(SessionState::Authenticated));
        assert_eq!(registry.state(&b), Some(SessionState::Unauthenticated));
    }
}
