//! The identity-gated single-vote casting workflow.
//!
//! [`VotingWorkflow`] is the caller-facing surface. It wires the external
//! collaborators (identity store, camera, face detector, descriptor store,
//! vote ledger) to the per-session state machine and guarantees:
//! - No vote is written unless the session has a registered biometric.
//! - At most one vote record ever exists per identity, under any number of
//!   concurrent or retried casts.
//! - Completions for sessions that were logged out are discarded.

pub mod casting;
pub mod config;
pub mod deadline;
pub mod error;
pub mod logging;
pub mod registration;
pub mod tracing_spans;
pub mod workflow;

pub use casting::VoteCastingService;
pub use config::{ConfigError, LedgerBackend, VoteGateConfig};
pub use error::WorkflowError;
pub use logging::{init_logging, LogFormat};
pub use registration::{BiometricRegistration, Registered};
pub use workflow::{Collaborators, VotingWorkflow, WorkflowOptions};

pub use votegate_session::Operation;
pub use votegate_types::{Credential, Identity, Receipt, SessionState, SessionToken};
