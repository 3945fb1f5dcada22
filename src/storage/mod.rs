//! Short-lived storage for submitted link lists
//!
//! Submissions are keyed by a random v4 UUID and disappear once their
//! time-to-live has passed.

mod memory;

pub use memory::MemoryStore;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

pub trait SubStore {
    /// Store `content` and return the id it can be read back with
    fn put(
        &self,
        content: String,
        ttl: Duration,
    ) -> impl Future<Output = Result<String, StoreError>>;

    /// Read a submission, `None` when unknown or expired
    fn get(&self, id: &str) -> impl Future<Output = Result<Option<String>, StoreError>>;
}

/// Generate an unguessable submission id
pub fn new_submission_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
