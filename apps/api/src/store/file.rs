use std::collections::HashSet;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::{debug, error, warn};

use crate::jobs::models::JobRecord;
use crate::store::{JobStore, StoreError};

/// Stores all records as one pretty-printed JSON array in a single file.
///
/// Writes go to a temp file in the same directory and are renamed over the
/// target, so a concurrent reader only ever sees a complete file.
#[derive(Debug, Clone)]
pub struct FileJobStore {
    path: PathBuf,
}

impl FileJobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Moves an unreadable store file aside so the next write cannot destroy it.
    async fn quarantine(&self) -> std::io::Result<()> {
        let target = quarantine_path(&self.path);
        tokio::fs::rename(&self.path, &target).await?;
        error!(
            "Quarantined unreadable job store {} as {}; its records are no longer listed",
            self.path.display(),
            target.display()
        );
        Ok(())
    }

    /// Reads the file, quarantining it when it cannot be read or parsed.
    ///
    /// Errs only if the file is unusable and could not be moved aside.
    async fn load(&self) -> Result<Vec<JobRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Job store {} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                error!("Failed to read job store {}: {e}", self.path.display());
                return self.set_aside().await;
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            warn!("Job store {} is empty", self.path.display());
            return Ok(Vec::new());
        }

        match serde_json::from_slice::<Vec<JobRecord>>(&bytes) {
            Ok(records) => Ok(drop_duplicate_ids(records)),
            Err(e) => {
                // A single bad record (e.g. an unknown status) rejects the whole array.
                error!(
                    "Job store {} is not a valid job list, so none of its records can be \
                     loaded: {e}",
                    self.path.display()
                );
                self.set_aside().await
            }
        }
    }

    async fn set_aside(&self) -> Result<Vec<JobRecord>, StoreError> {
        match self.quarantine().await {
            Ok(()) => Ok(Vec::new()),
            Err(source) => Err(StoreError::Unreadable {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl JobStore for FileJobStore {
    async fn read_all(&self) -> Vec<JobRecord> {
        self.load().await.unwrap_or_else(|e| {
            error!("{e}; listing no jobs");
            Vec::new()
        })
    }

    async fn read_for_update(&self) -> Result<Vec<JobRecord>, StoreError> {
        self.load().await
    }

    async fn write_all(&self, records: &[JobRecord]) -> Result<(), StoreError> {
        let contents = serde_json::to_vec_pretty(records)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || persist_atomically(&path, &contents))
            .await
            .map_err(|e| StoreError::Write {
                path: self.path.clone(),
                source: std::io::Error::new(ErrorKind::Other, e),
            })??;

        debug!(
            "Wrote {} job records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn persist_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

fn quarantine_path(path: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "jobs.json".into());
    name.push(format!(".corrupt-{stamp}"));
    path.with_file_name(name)
}

/// Keeps the first record for each id.
fn drop_duplicate_ids(records: Vec<JobRecord>) -> Vec<JobRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let first = seen.insert(record.id.clone());
            if !first {
                warn!("Dropping duplicate job id {} found in store", record.id);
            }
            first
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::models::JobStatus;
    use chrono::{DateTime, Utc};

    fn record(id: &str, title: &str) -> JobRecord {
        let ts: DateTime<Utc> = "2024-05-01T12:00:00.250Z".parse().unwrap();
        JobRecord {
            id: id.to_string(),
            job_title: title.to_string(),
            company_name: "Acme".to_string(),
            application_link: "https://acme.com/apply".to_string(),
            status: JobStatus::Applied,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn corrupt_siblings(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.to_string_lossy().contains(".corrupt-"))
            .collect()
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path().join("nested/jobs.json"));
        assert!(store.read_all().await.is_empty());
        assert!(!dir.path().join("nested").exists());
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path().join("data/jobs.json"));
        let records = vec![record("a", "First"), record("b", "Second")];

        store.write_all(&records).await.unwrap();

        assert_eq!(store.read_all().await, records);
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path().join("jobs.json"));
        store.write_all(&[record("a", "First")]).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"jobTitle\": \"First\""));
        assert!(text.contains("\"createdAt\": \"2024-05-01T12:00:00.250Z\""));
    }

    #[tokio::test]
    async fn test_rewriting_what_was_read_leaves_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileJobStore::new(dir.path().join("jobs.json"));
        store
            .write_all(&[record("z", "Last"), record("a", "First")])
            .await
            .unwrap();
        let before = std::fs::read(store.path()).unwrap();

        let records = store.read_all().await;
        store.write_all(&records).await.unwrap();

        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_quarantined_and_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "[{\"id\": \"broken\"").unwrap();
        let store = FileJobStore::new(&path);

        assert!(store.read_all().await.is_empty());
        assert!(!path.exists());

        let moved = corrupt_siblings(dir.path());
        assert_eq!(moved.len(), 1);
        assert_eq!(
            std::fs::read_to_string(&moved[0]).unwrap(),
            "[{\"id\": \"broken\""
        );

        store.write_all(&[record("a", "Fresh")]).await.unwrap();
        assert_eq!(store.read_all().await.len(), 1);
        assert_eq!(corrupt_siblings(dir.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_read_error_sets_file_aside_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        // Reading a directory fails with an I/O error other than NotFound.
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep.txt"), "old data").unwrap();
        let store = FileJobStore::new(&path);

        assert!(store.read_for_update().await.unwrap().is_empty());
        let moved = corrupt_siblings(dir.path());
        assert_eq!(moved.len(), 1);
        assert_eq!(
            std::fs::read_to_string(moved[0].join("keep.txt")).unwrap(),
            "old data"
        );

        store.write_all(&[record("a", "Fresh")]).await.unwrap();
        assert_eq!(store.read_all().await.len(), 1);
        assert!(moved[0].join("keep.txt").exists());
    }

    #[tokio::test]
    async fn test_unknown_status_quarantines_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let mut records = serde_json::to_value(vec![record("a", "Valid")]).unwrap();
        let mut legacy = records[0].clone();
        legacy["id"] = "b".into();
        legacy["status"] = "Ghosted".into();
        records.as_array_mut().unwrap().push(legacy);
        let raw = serde_json::to_string_pretty(&records).unwrap();
        std::fs::write(&path, &raw).unwrap();
        let store = FileJobStore::new(&path);

        assert!(store.read_all().await.is_empty());
        let moved = corrupt_siblings(dir.path());
        assert_eq!(moved.len(), 1);
        assert_eq!(std::fs::read_to_string(&moved[0]).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_whitespace_file_reads_as_empty_without_quarantine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "  \n").unwrap();
        let store = FileJobStore::new(&path);

        assert!(store.read_all().await.is_empty());
        assert!(path.exists());
        assert!(corrupt_siblings(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ids_keep_first_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        let raw = serde_json::to_string(&vec![
            record("dup", "Kept"),
            record("other", "Other"),
            record("dup", "Dropped"),
        ])
        .unwrap();
        std::fs::write(&path, raw).unwrap();

        let records = FileJobStore::new(&path).read_all().await;
        let titles: Vec<_> = records.iter().map(|r| r.job_title.as_str()).collect();
        assert_eq!(titles, vec!["Kept", "Other"]);
    }

    #[tokio::test]
    async fn test_unwritable_location_surfaces_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();
        let store = FileJobStore::new(blocker.join("jobs.json"));

        let err = store.write_all(&[record("a", "First")]).await.unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn test_quarantine_path_keeps_original_name() {
        let target = quarantine_path(Path::new("/srv/data/jobs.json"));
        let name = target.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jobs.json.corrupt-"));
        assert_eq!(target.parent(), Some(Path::new("/srv/data")));
    }
}
