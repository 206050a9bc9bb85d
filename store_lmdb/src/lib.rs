//! LMDB storage backend for the votegate workflow.
//!
//! Implements the storage traits from `votegate-store` using the `heed` LMDB
//! bindings. All logical stores live as named databases inside a single
//! environment.

pub mod descriptor;
pub mod environment;
pub mod error;
pub mod vote;

pub use descriptor::LmdbDescriptorStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use vote::LmdbVoteLedger;

/// Runs a write transaction off the async runtime. LMDB writers block on the
/// environment's single writer lock.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, LmdbError>
where
    F: FnOnce() -> Result<T, LmdbError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Values are bincode-encoded serde structs.
pub(crate) fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(value).map_err(LmdbError::from)
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    bincode::deserialize(bytes).map_err(LmdbError::from)
}
