use crate::infrastructure::db::dto::VehicleRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::vehicle_store::{VehicleRepositoryError, VehicleStore};
use async_trait::async_trait;
use std::sync::Arc;

const VEHICLE_COLUMNS: &str = "
    id,
    scope_id,
    plate,
    make,
    model,
    owner_name,
    assigned_technician,
    status,
    tasks,
    updated_at";

#[derive(Clone)]
pub struct VehicleStorePostgres {
    db: Arc<PostgresDatabase>,
}

impl VehicleStorePostgres {
    pub fn new(db: Arc<PostgresDatabase>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VehicleStore for VehicleStorePostgres {
    async fn get(
        &self,
        vehicle_id: uuid::Uuid,
    ) -> Result<Option<VehicleRow>, VehicleRepositoryError> {
        let sql = format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE id = $1");
        sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(vehicle_id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|_| VehicleRepositoryError::StorageUnavailable)
    }

    async fn list_by_scope(
        &self,
        scope_id: uuid::Uuid,
    ) -> Result<Vec<VehicleRow>, VehicleRepositoryError> {
        let sql =
            format!("SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE scope_id = $1 ORDER BY plate");
        sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(scope_id)
            .fetch_all(self.db.pool())
            .await
            .map_err(|_| VehicleRepositoryError::StorageUnavailable)
    }

    async fn insert(&self, row: &VehicleRow) -> Result<VehicleRow, VehicleRepositoryError> {
        let sql = format!(
            "INSERT INTO vehicles ({VEHICLE_COLUMNS})
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            RETURNING {VEHICLE_COLUMNS}"
        );
        sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(row.id)
            .bind(row.scope_id)
            .bind(&row.plate)
            .bind(&row.make)
            .bind(&row.model)
            .bind(&row.owner_name)
            .bind(&row.assigned_technician)
            .bind(&row.status)
            .bind(&row.tasks)
            .bind(row.updated_at)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    VehicleRepositoryError::Conflict
                }
                _ => VehicleRepositoryError::StorageUnavailable,
            })
    }

    async fn update(&self, row: &VehicleRow) -> Result<VehicleRow, VehicleRepositoryError> {
        let sql = format!(
            "UPDATE vehicles SET
                assigned_technician = $2,
                status = $3,
                tasks = $4,
                updated_at = $5
            WHERE id = $1
            RETURNING {VEHICLE_COLUMNS}"
        );
        let stored = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(row.id)
            .bind(&row.assigned_technician)
            .bind(&row.status)
            .bind(&row.tasks)
            .bind(row.updated_at)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|_| VehicleRepositoryError::StorageUnavailable)?;

        stored.ok_or(VehicleRepositoryError::NotFound)
    }

    async fn delete(&self, vehicle_id: uuid::Uuid) -> Result<(), VehicleRepositoryError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(vehicle_id)
            .execute(self.db.pool())
            .await
            .map_err(|_| VehicleRepositoryError::StorageUnavailable)?;

        if result.rows_affected() == 0 {
            return Err(VehicleRepositoryError::NotFound);
        }

        Ok(())
    }
}
