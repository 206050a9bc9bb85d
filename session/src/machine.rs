//! The state machine for one session.

use votegate_types::{Identity, SessionState, SessionToken};

use crate::{Operation, SessionError};

/// State of one live session.
#[derive(Clone, Debug)]
pub struct VotingSession {
    token: SessionToken,
    state: SessionState,
    identity: Option<Identity>,
}

impl VotingSession {
    pub fn new(token: SessionToken) -> Self {
        Self {
            token,
            state: SessionState::Unauthenticated,
            identity: None,
        }
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Guard for sign-up / sign-in: only a fresh session may authenticate.
    pub fn begin_authentication(&self, operation: Operation) -> Result<(), SessionError> {
        if !self.state.can_authenticate() {
            return Err(self.reject(operation));
        }
        Ok(())
    }

    /// Apply a successful sign-up / sign-in.
    ///
    /// Re-checks the guard: two overlapping sign-ins on one session both pass
    /// `begin_authentication`, but only the first completion is applied.
    pub fn complete_authentication(
        &mut self,
        operation: Operation,
        identity: Identity,
    ) -> Result<(), SessionError> {
        self.begin_authentication(operation)?;
        self.identity = Some(identity);
        self.advance(SessionState::Authenticated);
        Ok(())
    }

    /// Guard for biometric registration. Returns the identity to register for.
    pub fn begin_registration(&self) -> Result<Identity, SessionError> {
        match (&self.identity, self.state.can_register()) {
            (Some(identity), true) => Ok(identity.clone()),
            _ => Err(self.reject(Operation::RegisterBiometric)),
        }
    }

    /// Apply a durable registration. Re-registering after a vote keeps the
    /// session at `VoteCast`.
    pub fn complete_registration(&mut self) -> Result<SessionState, SessionError> {
        self.begin_registration()?;
        self.advance(SessionState::BiometricRegistered);
        Ok(self.state)
    }

    /// Guard for casting. Returns the identity to cast for.
    pub fn begin_vote(&self) -> Result<Identity, SessionError> {
        match (&self.identity, self.state) {
            (Some(identity), SessionState::BiometricRegistered) => Ok(identity.clone()),
            _ => Err(self.reject(Operation::CastVote)),
        }
    }

    /// Record that the identity's vote is in the ledger, whether this session
    /// wrote it or lost a race to another device. Idempotent.
    pub fn complete_vote(&mut self) {
        self.advance(SessionState::VoteCast);
    }

    fn advance(&mut self, to: SessionState) {
        if to > self.state {
            tracing::info!(session = %self.token, from = %self.state, to = %to, "session transition");
            self.state = to;
        }
    }

    fn reject(&self, operation: Operation) -> SessionError {
        let err = match (operation, self.state) {
            (Operation::CastVote, SessionState::VoteCast) => SessionError::AlreadyVoted,
            (Operation::RegisterBiometric, SessionState::Unauthenticated) => {
                SessionError::Unauthorized { operation }
            }
            (operation, state) => SessionError::PreconditionFailed { operation, state },
        };
        tracing::debug!(session = %self.token, %operation, state = %self.state, "guard rejected: {err}");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id() -> Identity {
        Identity::new("uid-1").unwrap()
    }

    fn authenticated() -> VotingSession {
        let mut s = VotingSession::new(SessionToken::generate());
        s.complete_authentication(Operation::SignIn, id()).unwrap();
        s
    }

    fn registered() -> VotingSession {
        let mut s = authenticated();
        s.complete_registration().unwrap();
        s
    }

    #[test]
    fn fresh_session_is_unauthenticated() {
        let s = VotingSession::new(SessionToken::generate());
        assert_eq!(s.state(), SessionState::Unauthenticated);
        assert!(s.identity().is_none());
    }

    #[test]
    fn register_while_unauthenticated_is_unauthorized() {
        let s = VotingSession::new(SessionToken::generate());
        assert_eq!(
            s.begin_registration(),
            Err(SessionError::Unauthorized {
                operation: Operation::RegisterBiometric
            })
        );
    }

    #[test]
    fn vote_requires_registration() {
        let s = authenticated();
        assert_eq!(
            s.begin_vote(),
            Err(SessionError::PreconditionFailed {
                operation: Operation::CastVote,
                state: SessionState::Authenticated,
            })
        );
        let fresh = VotingSession::new(SessionToken::generate());
        assert!(matches!(
            fresh.begin_vote(),
            Err(SessionError::PreconditionFailed { .. })
        ));
    }

    #[test]
    fn vote_after_vote_is_already_voted() {
        let mut s = registered();
        assert_eq!(s.begin_vote(), Ok(id()));
        s.complete_vote();
        assert_eq!(s.state(), SessionState::VoteCast);
        assert_eq!(s.begin_vote(), Err(SessionError::AlreadyVoted));
    }

    #[test]
    fn complete_vote_is_idempotent() {
        let mut s = registered();
        s.complete_vote();
        s.complete_vote();
        assert_eq!(s.state(), SessionState::VoteCast);
    }

    #[test]
    fn reauthentication_is_rejected() {
        let mut s = authenticated();
        let other = Identity::new("uid-2").unwrap();
        assert!(matches!(
            s.complete_authentication(Operation::SignIn, other),
            Err(SessionError::PreconditionFailed { .. })
        ));
        assert_eq!(s.identity(), Some(&id()));
    }

    #[test]
    fn reregistration_after_vote_keeps_vote_cast() {
        let mut s = registered();
        s.complete_vote();
        assert_eq!(s.begin_registration(), Ok(id()));
        assert_eq!(s.complete_registration(), Ok(SessionState::VoteCast));
    }

    #[derive(Clone, Copy, Debug)]
    enum Step {
        SignIn,
        Register,
        Vote,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![Just(Step::SignIn), Just(Step::Register), Just(Step::Vote)]
    }

    proptest! {
        /// No sequence of operations ever moves a session backwards, and a
        /// vote is only ever applied from BiometricRegistered.
        #[test]
        fn transitions_are_monotonic(steps in proptest::collection::vec(step(), 0..24)) {
            let mut s = VotingSession::new(SessionToken::generate());
            let mut previous = s.state();
            for step in steps {
                match step {
                    Step::SignIn => { let _ = s.complete_authentication(Operation::SignIn, id()); }
                    Step::Register => { let _ = s.complete_registration(); }
                    Step::Vote => {
                        let before = s.state();
                        if s.begin_vote().is_ok() {
                            prop_assert_eq!(before, SessionState::BiometricRegistered);
                            s.complete_vote();
                        }
                    }
                }
                prop_assert!(s.state() >= previous);
                previous = s.state();
            }
        }
    }
}
