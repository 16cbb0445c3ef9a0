use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::JobRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRepositoryError {
    NotFound,
    Conflict,
    InvalidInput,
    StorageUnavailable,
}

impl From<DatabaseError> for JobRepositoryError {
    fn from(_: DatabaseError) -> Self {
        JobRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Fetch a job by its ID. Returns `None` if it doesn't exist.
    async fn get(&self, job_id: uuid::Uuid) -> Result<Option<JobRow>, JobRepositoryError>;
    /// List every job in a company/branch scope, ordered by job number.
    async fn list_by_scope(&self, scope_id: uuid::Uuid) -> Result<Vec<JobRow>, JobRepositoryError>;
    /// Create a job and return exactly what was stored.
    async fn insert(&self, row: &JobRow) -> Result<JobRow, JobRepositoryError>;
    /// Update a job and return exactly what was stored.
    async fn update(&self, row: &JobRow) -> Result<JobRow, JobRepositoryError>;
    /// Delete a job by its ID. Returns an error if it doesn't exist.
    async fn delete(&self, job_id: uuid::Uuid) -> Result<(), JobRepositoryError>;
}
