use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BiometricError {
    #[error("no face detected")]
    NoSubjectDetected,

    #[error("{count} faces detected; only one person can register")]
    AmbiguousSubject { count: usize },

    #[error("malformed face descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("image capture failed: {0}")]
    CaptureFailed(String),

    #[error("biometric service unavailable: {0}")]
    Unavailable(String),
}

impl BiometricError {
    /// Whether the caller may simply capture again.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::CaptureFailed(_))
    }
}
