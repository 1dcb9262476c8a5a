//! Record Store: whole-set persistence of job records.
//!
//! Handlers never touch the filesystem directly; they go through a `JobStore`
//! held in `AppState` as `Arc<dyn JobStore>`. Production uses `FileJobStore`;
//! tests swap in `MemoryJobStore`.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::jobs::models::JobRecord;

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileJobStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize job records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("job store at {} is unreadable and could not be set aside: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write job store at {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Returns every persisted record in stored order.
    ///
    /// Never fails: a missing backing file is an empty store, and an unreadable
    /// one is reported through `tracing`, moved aside and read as empty.
    async fn read_all(&self) -> Vec<JobRecord>;

    /// Like `read_all`, but for callers about to write the set back.
    ///
    /// Fails when existing data could not be read and is still in place, so
    /// the following write would destroy it.
    async fn read_for_update(&self) -> Result<Vec<JobRecord>, StoreError> {
        Ok(self.read_all().await)
    }

    /// Replaces the persisted set with `records`. Readers see either the old
    /// set or the new one, never a mix.
    async fn write_all(&self, records: &[JobRecord]) -> Result<(), StoreError>;
}
