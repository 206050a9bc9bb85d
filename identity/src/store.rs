//! The identity store trait and credential validation.

use async_trait::async_trait;
use votegate_types::{Credential, Identity, MIN_PASSWORD_LEN};

use crate::IdentityError;

/// An external authentication service.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Human-readable name of this backend, for logs.
    fn name(&self) -> &str;

    /// Check an existing credential and return its identity.
    async fn authenticate(&self, credential: &Credential) -> Result<Identity, IdentityError>;

    /// Register a new credential and return the freshly issued identity.
    async fn create_identity(&self, credential: &Credential) -> Result<Identity, IdentityError>;
}

/// Client-side credential check, run before any identity-store call.
pub fn check_credential(credential: &Credential) -> Result<(), IdentityError> {
    if !credential.is_strong_enough() {
        return Err(IdentityError::WeakCredential {
            min_len: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}
