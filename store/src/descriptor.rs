//! Biometric descriptor storage trait.

use async_trait::async_trait;
use votegate_types::{BiometricDescriptor, Identity};

use crate::StoreError;

/// Durable identity → registered face descriptor map.
///
/// Unlike the vote ledger, registration is rebindable: `put_descriptor`
/// overwrites whatever was stored before.
#[async_trait]
pub trait DescriptorStore: Send + Sync {
    async fn put_descriptor(
        &self,
        identity: &Identity,
        descriptor: &BiometricDescriptor,
    ) -> Result<(), StoreError>;

    async fn get_descriptor(
        &self,
        identity: &Identity,
    ) -> Result<Option<BiometricDescriptor>, StoreError>;
}
