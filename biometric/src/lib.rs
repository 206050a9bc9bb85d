//! Biometric capture for voter registration.
//!
//! The workflow does not specify HOW a face is found in an image, only that
//! one capture must yield exactly one face before it is bound to an identity.
//! Camera and detector are pluggable collaborators; the single-subject rule
//! lives here.

pub mod error;
pub mod selection;
pub mod source;

pub use error::BiometricError;
pub use selection::select_single_subject;
pub use source::{BiometricVerifier, Camera};
