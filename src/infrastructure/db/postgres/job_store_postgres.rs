use crate::infrastructure::db::dto::JobRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::job_store::{JobRepositoryError, JobStore};
use async_trait::async_trait;
use std::sync::Arc;

const JOB_COLUMNS: &str = "
    id,
    scope_id,
    job_number,
    status,
    priority,
    work_completed,
    quality_check_completed,
    delivery_completed,
    assigned_technician,
    vehicle_id,
    customer_name,
    vehicle_label,
    services,
    task_statuses,
    notes,
    created_at,
    updated_at";

#[derive(Clone)]
pub struct JobStorePostgres {
    db: Arc<PostgresDatabase>,
}

impl JobStorePostgres {
    /// Build a Postgres-backed job store.
    pub fn new(db: Arc<PostgresDatabase>) -> Self {
        Self { db }
    }
}

fn map_write_error(err: sqlx::Error) -> JobRepositoryError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => JobRepositoryError::Conflict,
        sqlx::Error::Database(db) if db.is_check_violation() => JobRepositoryError::InvalidInput,
        _ => JobRepositoryError::StorageUnavailable,
    }
}

#[async_trait]
impl JobStore for JobStorePostgres {
    async fn get(&self, job_id: uuid::Uuid) -> Result<Option<JobRow>, JobRepositoryError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(job_id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|_| JobRepositoryError::StorageUnavailable)
    }

    async fn list_by_scope(&self, scope_id: uuid::Uuid) -> Result<Vec<JobRow>, JobRepositoryError> {
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE scope_id = $1 ORDER BY job_number, created_at"
        );
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(scope_id)
            .fetch_all(self.db.pool())
            .await
            .map_err(|_| JobRepositoryError::StorageUnavailable)
    }

    async fn insert(&self, row: &JobRow) -> Result<JobRow, JobRepositoryError> {
        let sql = format!(
            "INSERT INTO jobs ({JOB_COLUMNS})
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,$16,$17)
            RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(row.id)
            .bind(row.scope_id)
            .bind(&row.job_number)
            .bind(&row.status)
            .bind(&row.priority)
            .bind(row.work_completed)
            .bind(row.quality_check_completed)
            .bind(row.delivery_completed)
            .bind(&row.assigned_technician)
            .bind(row.vehicle_id)
            .bind(&row.customer_name)
            .bind(&row.vehicle_label)
            .bind(&row.services)
            .bind(&row.task_statuses)
            .bind(&row.notes)
            .bind(row.created_at)
            .bind(row.updated_at)
            .fetch_one(self.db.pool())
            .await
            .map_err(map_write_error)
    }

    async fn update(&self, row: &JobRow) -> Result<JobRow, JobRepositoryError> {
        let sql = format!(
            "UPDATE jobs SET
                status = $2,
                priority = $3,
                work_completed = $4,
                quality_check_completed = $5,
                delivery_completed = $6,
                assigned_technician = $7,
                vehicle_id = $8,
                customer_name = $9,
                vehicle_label = $10,
                services = $11,
                task_statuses = $12,
                notes = $13,
                updated_at = $14
            WHERE id = $1
            RETURNING {JOB_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, JobRow>(&sql)
            .bind(row.id)
            .bind(&row.status)
            .bind(&row.priority)
            .bind(row.work_completed)
            .bind(row.quality_check_completed)
            .bind(row.delivery_completed)
            .bind(&row.assigned_technician)
            .bind(row.vehicle_id)
            .bind(&row.customer_name)
            .bind(&row.vehicle_label)
            .bind(&row.services)
            .bind(&row.task_statuses)
            .bind(&row.notes)
            .bind(row.updated_at)
            .fetch_optional(self.db.pool())
            .await
            .map_err(map_write_error)?;

        stored.ok_or(JobRepositoryError::NotFound)
    }

    async fn delete(&self, job_id: uuid::Uuid) -> Result<(), JobRepositoryError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(self.db.pool())
            .await
            .map_err(|_| JobRepositoryError::StorageUnavailable)?;

        if result.rows_affected() == 0 {
            return Err(JobRepositoryError::NotFound);
        }

        Ok(())
    }
}
