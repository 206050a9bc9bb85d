//! Identity store contract.
//!
//! The identity store (an external authentication service) turns a
//! credential pair into a stable [`Identity`]. This crate only defines the
//! contract and the client-side strength check that must pass before any
//! call is made; credential storage and hashing stay with the service.

pub mod error;
pub mod store;

pub use error::IdentityError;
pub use store::{check_credential, IdentityStore};

pub use votegate_types::{Credential, Identity};
