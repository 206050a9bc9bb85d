//! REST adapters for the hosted backends.
//!
//! - [`RestIdentityStore`]: email/password accounts (`accounts:signUp`,
//!   `accounts:signInWithPassword`).
//! - [`RestVoteLedger`]: the `votes` collection, written with a
//!   create-only request so the server enforces one record per identity.
//! - [`RestDescriptorStore`]: the `users` collection holding each
//!   identity's face descriptor.
//!
//! Documents use the typed-field JSON encoding in [`document`].

pub mod client;
pub mod document;
pub mod error;
pub mod identity;
pub mod ledger;

pub use client::{HttpClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use error::RemoteError;
pub use identity::RestIdentityStore;
pub use ledger::{RestDescriptorStore, RestVoteLedger};
