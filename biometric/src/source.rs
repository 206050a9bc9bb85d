//! Camera and detector traits.

use async_trait::async_trait;
use votegate_types::{BiometricDescriptor, ImageSample};

use crate::BiometricError;

/// Produces one still image per call.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn capture(&self) -> Result<ImageSample, BiometricError>;
}

/// Finds faces in a captured image.
///
/// Implementations might include an on-device landmark model or a remote
/// vision API. An image with no faces is `Ok(vec![])`, not an error.
#[async_trait]
pub trait BiometricVerifier: Send + Sync {
    /// Human-readable name of this detector, for logs.
    fn name(&self) -> &str;

    async fn detect(&self, sample: &ImageSample) -> Result<Vec<BiometricDescriptor>, BiometricError>;
}
