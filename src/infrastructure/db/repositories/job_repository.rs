use crate::domain::entities::job::Job;
use crate::domain::value_objects::ids::{JobId, ScopeId};
use crate::infrastructure::db::dto::JobRow;
use crate::infrastructure::db::stores::job_store::{JobRepositoryError, JobStore};
use std::sync::Arc;

/// Remote job client: entity-level CRUD over a `JobStore`.
pub struct JobRepository {
    store: Arc<dyn JobStore>,
}

impl JobRepository {
    /// Build a repository that uses the given store implementation.
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// Create a job and return what was actually stored.
    pub async fn insert(&self, job: &Job) -> Result<Job, JobRepositoryError> {
        let stored = self.store.insert(&JobRow::from_job(job)).await?;
        Ok(stored.into_job())
    }

    /// Fetch a job by its ID. Returns `None` if it doesn't exist.
    pub async fn get(&self, job_id: JobId) -> Result<Option<Job>, JobRepositoryError> {
        let row = self.store.get(job_id.0).await?;
        Ok(row.map(JobRow::into_job))
    }

    /// Every job in the scope, ordered by job number.
    pub async fn list_by_scope(&self, scope_id: ScopeId) -> Result<Vec<Job>, JobRepositoryError> {
        let rows = self.store.list_by_scope(scope_id.0).await?;
        Ok(rows.into_iter().map(JobRow::into_job).collect())
    }

    /// Update a job and return what was actually stored.
    pub async fn update(&self, job: &Job) -> Result<Job, JobRepositoryError> {
        let stored = self.store.update(&JobRow::from_job(job)).await?;
        Ok(stored.into_job())
    }

    /// Delete a job by its ID. Returns an error if it doesn't exist.
    pub async fn delete(&self, job_id: JobId) -> Result<(), JobRepositoryError> {
        self.store.delete(job_id.0).await
    }
}
