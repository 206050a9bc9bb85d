//! Abstract storage traits for the votegate workflow.
//!
//! Every storage backend (LMDB, the remote document store, in-memory for
//! testing) implements these traits. The rest of the codebase depends only on
//! the traits.

pub mod descriptor;
pub mod error;
pub mod vote;

pub use descriptor::DescriptorStore;
pub use error::StoreError;
pub use vote::VoteLedger;
