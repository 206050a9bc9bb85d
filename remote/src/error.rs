use thiserror::Error;

use votegate_identity::IdentityError;
use votegate_store::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("failed to create HTTP client: {0}")]
    Client(String),

    /// Timeouts, refused connections, dropped responses.
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),

    /// A document key that cannot be addressed as a single path segment.
    #[error("invalid document key '{0}'")]
    InvalidKey(String),
}

impl RemoteError {
    /// Whether trying again later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Client(_) | Self::Decode(_) | Self::InvalidKey(_) => false,
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Transport(format!("connection failed: {e}"))
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<RemoteError> for StoreError {
    fn from(e: RemoteError) -> Self {
        match e {
            e if e.is_transient() => StoreError::Unavailable(e.to_string()),
            RemoteError::Decode(msg) => StoreError::Serialization(msg),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<RemoteError> for IdentityError {
    fn from(e: RemoteError) -> Self {
        match e {
            e if e.is_transient() => IdentityError::Unavailable(e.to_string()),
            RemoteError::Status { message, .. } => IdentityError::Rejected(message),
            other => IdentityError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient_client_errors_are_not() {
        let down = RemoteError::Status {
            status: 503,
            message: "UNAVAILABLE".into(),
        };
        let denied = RemoteError::Status {
            status: 403,
            message: "PERMISSION_DENIED".into(),
        };
        assert!(down.is_transient());
        assert!(!denied.is_transient());
        assert!(matches!(StoreError::from(down), StoreError::Unavailable(_)));
        assert!(matches!(StoreError::from(denied), StoreError::Backend(_)));
    }

    #[test]
    fn identity_rejections_keep_server_message() {
        let e = RemoteError::Status {
            status: 400,
            message: "EMAIL_EXISTS".into(),
        };
        assert_eq!(
            IdentityError::from(e),
            IdentityError::Rejected("EMAIL_EXISTS".into())
        );
        let e = RemoteError::Transport("connection failed".into());
        assert!(matches!(IdentityError::from(e), IdentityError::Unavailable(_)));
    }

    #[test]
    fn malformed_identity_response_is_not_transient() {
        let e = RemoteError::Decode("missing field `localId`".into());
        assert!(!e.is_transient());
        assert!(matches!(IdentityError::from(e), IdentityError::Backend(_)));
        let e = RemoteError::Client("bad tls config".into());
        assert!(matches!(IdentityError::from(e), IdentityError::Backend(_)));
    }
}
