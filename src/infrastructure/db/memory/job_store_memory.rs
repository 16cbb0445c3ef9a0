use crate::infrastructure::db::dto::JobRow;
use crate::infrastructure::db::stores::job_store::{JobRepositoryError, JobStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Process-local job store for tests and offline runs. Reads and writes can be made to fail.
#[derive(Default)]
pub struct MemoryJobStore {
    rows: RwLock<HashMap<uuid::Uuid, JobRow>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: impl IntoIterator<Item = JobRow>) -> Self {
        let mut store = Self::new();
        *store.rows.get_mut() = rows.into_iter().map(|r| (r.id, r)).collect();
        store
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current stored copy of a row, bypassing failure injection.
    pub async fn snapshot(&self, job_id: uuid::Uuid) -> Option<JobRow> {
        self.rows.read().await.get(&job_id).cloned()
    }

    fn check_read(&self) -> Result<(), JobRepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(JobRepositoryError::StorageUnavailable);
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), JobRepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(JobRepositoryError::StorageUnavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn get(&self, job_id: uuid::Uuid) -> Result<Option<JobRow>, JobRepositoryError> {
        self.check_read()?;
        Ok(self.rows.read().await.get(&job_id).cloned())
    }

    async fn list_by_scope(&self, scope_id: uuid::Uuid) -> Result<Vec<JobRow>, JobRepositoryError> {
        self.check_read()?;
        let mut rows: Vec<JobRow> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| r.scope_id == scope_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.job_number
                .cmp(&b.job_number)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }

    async fn insert(&self, row: &JobRow) -> Result<JobRow, JobRepositoryError> {
        self.check_write()?;
        let mut rows = self.rows.write().await;
        if rows.contains_key(&row.id) {
            return Err(JobRepositoryError::Conflict);
        }
        rows.insert(row.id, row.clone());
        Ok(row.clone())
    }

    async fn update(&self, row: &JobRow) -> Result<JobRow, JobRepositoryError> {
        self.check_write()?;
        let mut rows = self.rows.write().await;
        let Some(existing) = rows.get_mut(&row.id) else {
            return Err(JobRepositoryError::NotFound);
        };
        // Identity columns are immutable once stored.
        let mut updated = row.clone();
        updated.scope_id = existing.scope_id;
        updated.job_number = existing.job_number.clone();
        updated.created_at = existing.created_at;
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, job_id: uuid::Uuid) -> Result<(), JobRepositoryError> {
        self.check_write()?;
        match self.rows.write().await.remove(&job_id) {
            Some(_) => Ok(()),
            None => Err(JobRepositoryError::NotFound),
        }
    }
}
