//! The caller-facing workflow: sessions, sign-in, registration, casting.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use votegate_biometric::{BiometricVerifier, Camera};
use votegate_identity::{check_credential, IdentityStore};
use votegate_session::{Operation, SessionRegistry};
use votegate_store::{DescriptorStore, VoteLedger};
use votegate_types::{
    BiometricDescriptor, Clock, Credential, Identity, Receipt, SessionState, SessionToken,
};

use crate::casting::VoteCastingService;
use crate::deadline::with_deadline;
use crate::registration::{BiometricRegistration, Registered};
use crate::tracing_spans::{auth_span, cast_span, register_span, session_span};
use crate::WorkflowError;

/// The external services a workflow talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityStore>,
    pub camera: Arc<dyn Camera>,
    pub detector: Arc<dyn BiometricVerifier>,
    pub descriptors: Arc<dyn DescriptorStore>,
    pub ledger: Arc<dyn VoteLedger>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Deadline applied to every collaborator call. `None` waits forever.
    pub call_timeout: Option<Duration>,
}

/// Drives sessions from "unauthenticated" to "vote recorded exactly once".
///
/// Each operation follows the same shape: check the session guard, make the
/// collaborator call without holding any lock, then apply the transition
/// only if the session is still live. A session logged out while a call is
/// outstanding therefore never comes back; the caller gets
/// [`WorkflowError::SessionClosed`].
pub struct VotingWorkflow {
    identity: Arc<dyn IdentityStore>,
    camera: Arc<dyn Camera>,
    detector: Arc<dyn BiometricVerifier>,
    registration: BiometricRegistration,
    casting: VoteCastingService,
    sessions: SessionRegistry,
    options: WorkflowOptions,
}

impl VotingWorkflow {
    pub fn new(collaborators: Collaborators, options: WorkflowOptions) -> Self {
        let Collaborators {
            identity,
            camera,
            detector,
            descriptors,
            ledger,
            clock,
        } = collaborators;
        Self {
            identity,
            camera,
            detector,
            registration: BiometricRegistration::new(descriptors, options.call_timeout),
            casting: VoteCastingService::new(ledger, clock, options.call_timeout),
            sessions: SessionRegistry::new(),
            options,
        }
    }

    /// Start a fresh, unauthenticated session.
    pub fn open_session(&self) -> SessionToken {
        let token = self.sessions.open();
        session_span(&token).in_scope(|| tracing::info!("session opened"));
        token
    }

    /// Destroy the session. Returns `false` if it was already gone.
    pub fn logout(&self, token: &SessionToken) -> bool {
        let closed = self.sessions.close(token);
        if closed {
            session_span(token).in_scope(|| tracing::info!("session closed"));
        }
        closed
    }

    /// Current state of a live session, `None` once logged out.
    pub fn state(&self, token: &SessionToken) -> Option<SessionState> {
        self.sessions.state(token)
    }

    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Create a new identity and authenticate the session as it.
    pub async fn sign_up(
        &self,
        token: &SessionToken,
        credential: &Credential,
    ) -> Result<Identity, WorkflowError> {
        self.authenticate(token, Operation::SignUp, credential)
            .instrument(auth_span(token, "sign_up"))
            .await
    }

    /// Authenticate the session as an existing identity.
    pub async fn sign_in(
        &self,
        token: &SessionToken,
        credential: &Credential,
    ) -> Result<Identity, WorkflowError> {
        self.authenticate(token, Operation::SignIn, credential)
            .instrument(auth_span(token, "sign_in"))
            .await
    }

    async fn authenticate(
        &self,
        token: &SessionToken,
        operation: Operation,
        credential: &Credential,
    ) -> Result<Identity, WorkflowError> {
        self.sessions
            .with_session(token, |s| s.begin_authentication(operation))?;
        // Weak passwords never reach the identity store.
        check_credential(credential)?;

        let call = async {
            match operation {
                Operation::SignUp => self.identity.create_identity(credential).await,
                _ => self.identity.authenticate(credential).await,
            }
        };
        let identity = match with_deadline("identity call", self.options.call_timeout, call).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(store = self.identity.name(), error = %e, "{operation} failed");
                return Err(e);
            }
        };

        self.sessions.with_session(token, |s| {
            s.complete_authentication(operation, identity.clone())
        })?;
        Ok(identity)
    }

    /// Capture a photo, detect faces, and bind the single face to the
    /// session's identity.
    ///
    /// Zero or several faces leave the session where it was; the caller may
    /// simply try again.
    pub async fn register_biometric(&self, token: &SessionToken) -> Result<Registered, WorkflowError> {
        let identity = self.sessions.with_session(token, |s| s.begin_registration())?;
        let span = register_span(token, &identity);
        async {
            let sample = with_deadline("camera capture", self.options.call_timeout, self.camera.capture()).await?;
            let detected = with_deadline(
                "face detection",
                self.options.call_timeout,
                self.detector.detect(&sample),
            )
            .await?;
            tracing::debug!(detector = self.detector.name(), faces = detected.len(), "detection finished");
            self.finish_registration(token, &identity, detected).await
        }
        .instrument(span)
        .await
    }

    /// Register from descriptors produced outside the workflow's camera and
    /// detector (e.g. a detector run on another device).
    pub async fn register_descriptors(
        &self,
        token: &SessionToken,
        detected: Vec<BiometricDescriptor>,
    ) -> Result<Registered, WorkflowError> {
        let identity = self.sessions.with_session(token, |s| s.begin_registration())?;
        self.finish_registration(token, &identity, detected)
            .instrument(register_span(token, &identity))
            .await
    }

    async fn finish_registration(
        &self,
        token: &SessionToken,
        identity: &Identity,
        detected: Vec<BiometricDescriptor>,
    ) -> Result<Registered, WorkflowError> {
        let descriptor = self.registration.select(detected)?;
        // Capture and detection can take a while; don't write for a session
        // that has been logged out in the meantime.
        self.sessions.with_session(token, |s| s.begin_registration())?;
        let registered = self.registration.store(identity, descriptor).await?;
        self.sessions
            .with_session(token, |s| s.complete_registration())?;
        Ok(registered)
    }

    /// Cast the session identity's one vote.
    ///
    /// Only a session in `BiometricRegistered` reaches the ledger. Losing a
    /// race to another session of the same identity yields
    /// [`WorkflowError::AlreadyVoted`] and still moves this session to
    /// `VoteCast`, since the identity has voted either way.
    pub async fn cast_vote(&self, token: &SessionToken) -> Result<Receipt, WorkflowError> {
        let identity = self.sessions.with_session(token, |s| s.begin_vote())?;
        let span = cast_span(token, &identity);
        async {
            let outcome = self.casting.cast_vote(&identity).await;
            if matches!(outcome, Ok(_) | Err(WorkflowError::AlreadyVoted { .. })) {
                self.sessions.with_session(token, |s| {
                    s.complete_vote();
                    Ok(())
                })?;
            }
            outcome
        }
        .instrument(span)
        .await
    }
}
