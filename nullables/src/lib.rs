//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators (clock, identity store, camera, face detector,
//! vote ledger, descriptor store) are abstracted behind traits. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically (queued results, injected outages)
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod biometric;
pub mod clock;
pub mod gate;
pub mod identity;
pub mod store;

pub use biometric::{NullBiometricVerifier, NullCamera};
pub use clock::NullClock;
pub use gate::PauseGate;
pub use identity::NullIdentityStore;
pub use store::{NullDescriptorStore, NullVoteLedger};
