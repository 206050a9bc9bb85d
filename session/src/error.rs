use std::fmt;

use thiserror::Error;
use votegate_types::{SessionState, SessionToken};

/// The caller-facing operation a guard was checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    SignUp,
    SignIn,
    RegisterBiometric,
    CastVote,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SignUp => "sign_up",
            Self::SignIn => "sign_in",
            Self::RegisterBiometric => "register_biometric",
            Self::CastVote => "cast_vote",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{operation} requires an authenticated session")]
    Unauthorized { operation: Operation },

    #[error("{operation} is not allowed while the session is {state}")]
    PreconditionFailed {
        operation: Operation,
        state: SessionState,
    },

    #[error("this session has already cast its vote")]
    AlreadyVoted,

    #[error("session {0} is closed")]
    SessionClosed(SessionToken),
}
