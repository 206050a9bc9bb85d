//! Nullable camera and face detector with scripted captures and detections.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use votegate_biometric::{BiometricError, BiometricVerifier, Camera};
use votegate_types::{BiometricDescriptor, ImageSample};

use crate::PauseGate;

/// A camera that returns a fixed frame and counts captures.
pub struct NullCamera {
    frame: ImageSample,
    failures: Mutex<VecDeque<BiometricError>>,
    captures: AtomicU64,
}

impl NullCamera {
    pub fn new() -> Self {
        Self {
            frame: ImageSample::new(b"null-frame".to_vec(), 0),
            failures: Mutex::new(VecDeque::new()),
            captures: AtomicU64::new(0),
        }
    }

    /// Make the next capture fail with `error`.
    pub fn fail_next(&self, error: BiometricError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn captures(&self) -> u64 {
        self.captures.load(Ordering::SeqCst)
    }
}

impl Default for NullCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Camera for NullCamera {
    async fn capture(&self) -> Result<ImageSample, BiometricError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.frame.clone())
    }
}

/// A detector that replays queued results in order.
///
/// With nothing queued, every image contains no faces. Detection can be
/// held with [`pause`](Self::pause) to model a slow detector.
pub struct NullBiometricVerifier {
    results: Mutex<VecDeque<Result<Vec<BiometricDescriptor>, BiometricError>>>,
    gate: PauseGate,
}

impl NullBiometricVerifier {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            gate: PauseGate::new(),
        }
    }

    pub fn pause(&self) {
        self.gate.pause();
    }

    pub fn resume(&self) {
        self.gate.resume();
    }

    /// Number of `detect` calls currently held at the gate.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Queue the faces found in the next image.
    pub fn push_faces(&self, faces: Vec<BiometricDescriptor>) {
        self.results.lock().unwrap().push_back(Ok(faces));
    }

    /// Queue a detector failure for the next image.
    pub fn push_error(&self, error: BiometricError) {
        self.results.lock().unwrap().push_back(Err(error));
    }
}

impl Default for NullBiometricVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BiometricVerifier for NullBiometricVerifier {
    fn name(&self) -> &str {
        "null-detector"
    }

    async fn detect(&self, _sample: &ImageSample) -> Result<Vec<BiometricDescriptor>, BiometricError> {
        self.gate.pass().await;
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
