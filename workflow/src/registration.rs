//! Biometric registration: bind exactly one detected face to an identity.

use std::sync::Arc;
use std::time::Duration;

use votegate_biometric::select_single_subject;
use votegate_store::DescriptorStore;
use votegate_types::{BiometricDescriptor, Identity};

use crate::deadline::with_deadline;
use crate::WorkflowError;

/// A descriptor durably bound to an identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Registered {
    pub identity: Identity,
    pub descriptor: BiometricDescriptor,
}

/// Stores the face descriptor for an identity.
///
/// Registration is rebindable: a new registration overwrites the previous
/// descriptor and has no effect on any vote already recorded.
pub struct BiometricRegistration {
    descriptors: Arc<dyn DescriptorStore>,
    deadline: Option<Duration>,
}

impl BiometricRegistration {
    pub fn new(descriptors: Arc<dyn DescriptorStore>, deadline: Option<Duration>) -> Self {
        Self {
            descriptors,
            deadline,
        }
    }

    /// Check the single-subject rule without writing anything.
    pub fn select(&self, detected: Vec<BiometricDescriptor>) -> Result<BiometricDescriptor, WorkflowError> {
        let count = detected.len();
        select_single_subject(detected).map_err(|e| {
            tracing::debug!(faces = count, "capture rejected: {e}");
            WorkflowError::from(e)
        })
    }

    /// Bind the one face in `detected` to `identity`.
    pub async fn register(
        &self,
        identity: &Identity,
        detected: Vec<BiometricDescriptor>,
    ) -> Result<Registered, WorkflowError> {
        let descriptor = self.select(detected)?;
        self.store(identity, descriptor).await
    }

    /// Persist an already selected descriptor.
    pub(crate) async fn store(
        &self,
        identity: &Identity,
        descriptor: BiometricDescriptor,
    ) -> Result<Registered, WorkflowError> {
        with_deadline(
            "descriptor store write",
            self.deadline,
            self.descriptors.put_descriptor(identity, &descriptor),
        )
        .await?;
        tracing::info!(%identity, bounds = %descriptor.bounds, "biometric registered");
        Ok(Registered {
            identity: identity.clone(),
            descriptor,
        })
    }
}
