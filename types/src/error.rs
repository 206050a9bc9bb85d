//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("invalid session token: {0}")]
    InvalidSessionToken(String),

    #[error("identity must not be empty")]
    EmptyIdentity,
}
