//! Thread-safe in-memory vote ledger and descriptor store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use votegate_store::{DescriptorStore, StoreError, VoteLedger};
use votegate_types::{BiometricDescriptor, Identity, VoteRecord};

use crate::PauseGate;

/// An in-memory vote ledger for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
///
/// Writes can be held at a gate with [`pause`](Self::pause) to model a
/// request that is still in flight, and failed with
/// [`set_unavailable`](Self::set_unavailable) to model connectivity loss.
pub struct NullVoteLedger {
    records: Mutex<HashMap<Identity, VoteRecord>>,
    create_calls: AtomicUsize,
    unavailable: AtomicBool,
    gate: PauseGate,
}

impl NullVoteLedger {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            create_calls: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
            gate: PauseGate::new(),
        }
    }

    /// Hold every subsequent `create_if_absent` until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.gate.pause();
    }

    pub fn resume(&self) {
        self.gate.resume();
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `create_if_absent` calls currently held at the gate.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// Number of `create_if_absent` calls received, successful or not.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records stored for `identity` (0 or 1).
    pub fn count_for(&self, identity: &Identity) -> usize {
        usize::from(self.records.lock().unwrap().contains_key(identity))
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null ledger offline".into()));
        }
        Ok(())
    }
}

impl Default for NullVoteLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VoteLedger for NullVoteLedger {
    async fn get(&self, identity: &Identity) -> Result<Option<VoteRecord>, StoreError> {
        self.check_online()?;
        Ok(self.records.lock().unwrap().get(identity).cloned())
    }

    async fn create_if_absent(&self, record: &VoteRecord) -> Result<bool, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;

        self.check_online()?;
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.identity) {
            return Ok(false);
        }
        records.insert(record.identity.clone(), record.clone());
        Ok(true)
    }
}

/// An in-memory descriptor store for testing.
///
/// Writes can be held with [`pause`](Self::pause) like the ledger's.
pub struct NullDescriptorStore {
    descriptors: Mutex<HashMap<Identity, BiometricDescriptor>>,
    puts: AtomicUsize,
    unavailable: AtomicBool,
    gate: PauseGate,
}

impl NullDescriptorStore {
    pub fn new() -> Self {
        Self {
            descriptors: Mutex::new(HashMap::new()),
            puts: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
            gate: PauseGate::new(),
        }
    }

    /// Hold every subsequent `put_descriptor` until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.gate.pause();
    }

    pub fn resume(&self) {
        self.gate.resume();
    }

    /// Number of `put_descriptor` calls currently held at the gate.
    pub fn in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.descriptors.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NullDescriptorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DescriptorStore for NullDescriptorStore {
    async fn put_descriptor(
        &self,
        identity: &Identity,
        descriptor: &BiometricDescriptor,
    ) -> Result<(), StoreError> {
        self.gate.pass().await;
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null descriptor store offline".into()));
        }
        self.descriptors
            .lock()
            .unwrap()
            .insert(identity.clone(), descriptor.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_descriptor(
        &self,
        identity: &Identity,
    ) -> Result<Option<BiometricDescriptor>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null descriptor store offline".into()));
        }
        Ok(self.descriptors.lock().unwrap().get(identity).cloned())
    }
}
