use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::jobs::models::JobRecord;
use crate::store::{JobStore, StoreError};

/// In-process store for tests. Counts calls and can be told to fail reads
/// for update or writes.
#[derive(Default)]
pub struct MemoryJobStore {
    records: Mutex<Vec<JobRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryJobStore {
    pub fn with_records(records: Vec<JobRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Vec<JobRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Makes `read_for_update` report existing data it cannot safely replace.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn read_all(&self) -> Vec<JobRecord> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.snapshot()
    }

    async fn read_for_update(&self) -> Result<Vec<JobRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            self.reads.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Unreadable {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(ErrorKind::Other, "input/output error"),
            });
        }
        Ok(self.read_all().await)
    }

    async fn write_all(&self, records: &[JobRecord]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Write {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(ErrorKind::PermissionDenied, "read-only medium"),
            });
        }
        *self.records.lock().unwrap() = records.to_vec();
        Ok(())
    }
}
