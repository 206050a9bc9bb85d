//! Nullable identity store: in-memory accounts with injectable outages.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use votegate_identity::{IdentityError, IdentityStore};
use votegate_types::{Credential, Identity};

use crate::PauseGate;

struct Account {
    password: String,
    identity: Identity,
}

/// An in-memory identity store for testing.
///
/// Identities are issued as `uid-1`, `uid-2`, ... in creation order.
/// Calls can be held with [`pause`](Self::pause) before they reach the
/// accounts.
pub struct NullIdentityStore {
    accounts: Mutex<HashMap<String, Account>>,
    next_id: AtomicU64,
    unavailable: AtomicBool,
    calls: AtomicU64,
    gate: PauseGate,
}

impl NullIdentityStore {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            unavailable: AtomicBool::new(false),
            calls: AtomicU64::new(0),
            gate: PauseGate::new(),
        }
    }

    /// Pre-register an account, bypassing `create_identity`.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        let identity = self.issue();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                identity,
            },
        );
        self
    }

    /// Simulate losing (or regaining) connectivity to the service.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn pause(&self) {
        self.gate.pause();
    }

    pub fn resume(&self) {
        self.gate.resume();
    }

    /// Number of calls currently held at the gate.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    /// Number of calls that reached the store.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    fn issue(&self) -> Identity {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Identity::new(format!("uid-{n}")).unwrap()
    }

    async fn enter(&self) -> Result<(), IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(IdentityError::Unavailable("null identity store offline".into()));
        }
        Ok(())
    }
}

impl Default for NullIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityStore for NullIdentityStore {
    fn name(&self) -> &str {
        "null-identity"
    }

    async fn authenticate(&self, credential: &Credential) -> Result<Identity, IdentityError> {
        self.enter().await?;
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&credential.email) {
            Some(account) if account.password == credential.password => {
                Ok(account.identity.clone())
            }
            Some(_) => Err(IdentityError::Rejected("INVALID_PASSWORD".into())),
            None => Err(IdentityError::Rejected("EMAIL_NOT_FOUND".into())),
        }
    }

    async fn create_identity(&self, credential: &Credential) -> Result<Identity, IdentityError> {
        self.enter().await?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&credential.email) {
            return Err(IdentityError::Rejected("EMAIL_EXISTS".into()));
        }
        let identity = self.issue();
        accounts.insert(
            credential.email.clone(),
            Account {
                password: credential.password.clone(),
                identity: identity.clone(),
            },
        );
        Ok(identity)
    }
}
