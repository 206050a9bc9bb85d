//! Identity handles and sign-in credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeError;

/// Minimum password length accepted before any identity call is made.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Opaque, stable handle for an authenticated user.
///
/// Issued by the identity store and never modified afterwards. Used as the
/// key of both the vote ledger and the descriptor store. Deserializing goes
/// through [`Identity::new`], so a stored empty handle is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Identity(String);

impl Identity {
    /// Wrap a raw identity string.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypeError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(TypeError::EmptyIdentity);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

/// An email/password pair submitted for sign-up or sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Whether the password meets the client-side length rule.
    ///
    /// Length is counted in UTF-16 code units, the unit the identity
    /// service's clients measure passwords in.
    pub fn is_strong_enough(&self) -> bool {
        self.password.encode_utf16().count() >= MIN_PASSWORD_LEN
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
