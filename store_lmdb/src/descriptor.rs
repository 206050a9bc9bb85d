//! LMDB implementation of DescriptorStore.

use std::sync::Arc;

use async_trait::async_trait;
use heed::types::Bytes;
use heed::{Database, Env};

use votegate_store::{DescriptorStore, StoreError};
use votegate_types::{BiometricDescriptor, Identity};

use crate::{blocking, decode, encode, LmdbError};

#[derive(Clone)]
pub struct LmdbDescriptorStore {
    pub(crate) env: Arc<Env>,
    pub(crate) descriptors_db: Database<Bytes, Bytes>,
}

#[async_trait]
impl DescriptorStore for LmdbDescriptorStore {
    async fn put_descriptor(
        &self,
        identity: &Identity,
        descriptor: &BiometricDescriptor,
    ) -> Result<(), StoreError> {
        let value = encode(descriptor)?;
        let key = identity.as_bytes().to_vec();
        let env = Arc::clone(&self.env);
        let db = self.descriptors_db;
        blocking(move || {
            let mut wtxn = env.write_txn()?;
            db.put(&mut wtxn, &key, &value)?;
            wtxn.commit()?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn get_descriptor(
        &self,
        identity: &Identity,
    ) -> Result<Option<BiometricDescriptor>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .descriptors_db
            .get(&rtxn, identity.as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(decode(bytes)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use votegate_types::BoundingBox;

    #[tokio::test]
    async fn put_overwrites_previous_descriptor() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let store = env.descriptor_store();
        let id = Identity::new("uid-1").unwrap();

        let first = BiometricDescriptor::new(BoundingBox::new(0, 0, 10, 10));
        let second = BiometricDescriptor::new(BoundingBox::new(5, 5, 50, 50))
            .with_eyes(Some(0.9), Some(0.8));

        assert!(store.get_descriptor(&id).await.unwrap().is_none());
        store.put_descriptor(&id, &first).await.unwrap();
        store.put_descriptor(&id, &second).await.unwrap();
        assert_eq!(store.get_descriptor(&id).await.unwrap(), Some(second));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn parallel_puts_for_distinct_identities_all_land() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let tasks: Vec<_> = (0..8i32)
            .map(|i| {
                let store = env.descriptor_store();
                tokio::spawn(async move {
                    let id = Identity::new(format!("uid-{i}")).unwrap();
                    let descriptor = BiometricDescriptor::new(BoundingBox::new(0, 0, i, i));
                    store.put_descriptor(&id, &descriptor).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let store = env.descriptor_store();
        for i in 0..8i32 {
            let id = Identity::new(format!("uid-{i}")).unwrap();
            let stored = store.get_descriptor(&id).await.unwrap().unwrap();
            assert_eq!(stored.bounds, BoundingBox::new(0, 0, i, i));
        }
    }
}
