//! Job operations over a `JobStore`: validate, read the whole set, mutate it in
//! memory, write it back.
//!
//! Each call re-reads the store, so nothing is cached across requests. Mutating
//! calls read through `read_for_update`, so a store that cannot be read safely
//! fails the request instead of being overwritten. They also hold `write_lock`
//! from their read until their write completes, which serializes
//! read-modify-write cycles inside this process. Two processes sharing one
//! file can still lose updates.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::ids::new_job_id;
use crate::jobs::models::{now_millis, JobPayload, JobRecord};
use crate::jobs::validation::validate_job_payload;
use crate::store::JobStore;

pub struct JobRepository {
    store: Arc<dyn JobStore>,
    write_lock: Mutex<()>,
}

impl JobRepository {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn list(&self) -> Vec<JobRecord> {
        self.store.read_all().await
    }

    pub async fn create(&self, payload: &JobPayload) -> Result<JobRecord, AppError> {
        let valid = validate_job_payload(payload)?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read_for_update().await?;

        let now = now_millis();
        let record = JobRecord {
            id: new_job_id(),
            job_title: valid.job_title,
            company_name: valid.company_name,
            application_link: valid.application_link,
            status: valid.status,
            created_at: now,
            updated_at: now,
        };

        records.push(record.clone());
        self.store.write_all(&records).await?;

        info!("Created job {} ({})", record.id, record.status);
        Ok(record)
    }

    pub async fn update(&self, id: &str, payload: &JobPayload) -> Result<JobRecord, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read_for_update().await?;

        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;

        let valid = validate_job_payload(payload)?;

        record.job_title = valid.job_title;
        record.company_name = valid.company_name;
        record.application_link = valid.application_link;
        record.status = valid.status;
        // Never earlier than the stored value, even after a clock step.
        record.updated_at = now_millis().max(record.updated_at);

        let updated = record.clone();
        self.store.write_all(&records).await?;

        info!("Updated job {} ({})", updated.id, updated.status);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<JobRecord, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.store.read_for_update().await?;

        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))?;
        let removed = records.remove(index);

        self.store.write_all(&records).await?;

        info!("Deleted job {}", removed.id);
        Ok(removed)
    }
}
