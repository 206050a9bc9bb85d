//! File-backed camera and detector for running the workflow from a shell.
//!
//! Face detection runs outside votegate. The driver is handed the
//! detector's output, a JSON array of descriptors, and replays it: the
//! "camera" reads the file and the "detector" decodes it.

use std::path::PathBuf;

use async_trait::async_trait;

use votegate_biometric::{BiometricError, BiometricVerifier, Camera};
use votegate_types::{BiometricDescriptor, ImageSample};

pub struct DetectionFileCamera {
    path: PathBuf,
}

impl DetectionFileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Camera for DetectionFileCamera {
    async fn capture(&self) -> Result<ImageSample, BiometricError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            BiometricError::CaptureFailed(format!("{}: {e}", self.path.display()))
        })?;
        Ok(ImageSample::new(bytes, 0))
    }
}

/// Decodes a captured detections file.
pub struct JsonDetector;

#[async_trait]
impl BiometricVerifier for JsonDetector {
    fn name(&self) -> &str {
        "json-detections"
    }

    async fn detect(&self, sample: &ImageSample) -> Result<Vec<BiometricDescriptor>, BiometricError> {
        parse_detections(&sample.bytes)
    }
}

pub fn parse_detections(bytes: &[u8]) -> Result<Vec<BiometricDescriptor>, BiometricError> {
    serde_json::from_slice(bytes)
        .map_err(|e| BiometricError::CaptureFailed(format!("invalid detections file: {e}")))
}
