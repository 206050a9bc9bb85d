//! Fundamental types for the votegate workflow.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! identities and credentials, biometric descriptors, vote records, timestamps,
//! session tokens and the session state enum.

pub mod biometric;
pub mod error;
pub mod identity;
pub mod session;
pub mod state;
pub mod time;
pub mod vote;

pub use biometric::{BiometricDescriptor, BoundingBox, ImageSample};
pub use error::TypeError;
pub use identity::{Credential, Identity, MIN_PASSWORD_LEN};
pub use session::SessionToken;
pub use state::SessionState;
pub use time::{Clock, SystemClock, Timestamp};
pub use vote::{Receipt, VoteRecord};
