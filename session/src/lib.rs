//! Per-session voting state machine.
//!
//! A session moves strictly forward:
//! 1. **Unauthenticated** → **Authenticated** once the identity store accepts a credential.
//! 2. **Authenticated** → **BiometricRegistered** once exactly one face is durably bound.
//! 3. **BiometricRegistered** → **VoteCast** once the ledger records the vote.
//!
//! Logout destroys the session; nothing ever moves backwards. Every remote
//! call is split into a `begin_*` guard, checked before the call, and a
//! `complete_*` transition, applied only after the call succeeded and only if
//! the session is still live in the [`SessionRegistry`].

pub mod error;
pub mod machine;
pub mod registry;

pub use error::{Operation, SessionError};
pub use machine::VotingSession;
pub use registry::SessionRegistry;
