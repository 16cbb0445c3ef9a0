use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::VehicleRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleRepositoryError {
    NotFound,
    Conflict,
    StorageUnavailable,
}

impl From<DatabaseError> for VehicleRepositoryError {
    fn from(_: DatabaseError) -> Self {
        VehicleRepositoryError::StorageUnavailable
    }
}

#[async_trait]
pub trait VehicleStore: Send + Sync {
    async fn get(
        &self,
        vehicle_id: uuid::Uuid,
    ) -> Result<Option<VehicleRow>, VehicleRepositoryError>;
    /// List vehicles in a scope, ordered by plate.
    async fn list_by_scope(
        &self,
        scope_id: uuid::Uuid,
    ) -> Result<Vec<VehicleRow>, VehicleRepositoryError>;
    async fn insert(&self, row: &VehicleRow) -> Result<VehicleRow, VehicleRepositoryError>;
    async fn update(&self, row: &VehicleRow) -> Result<VehicleRow, VehicleRepositoryError>;
    async fn delete(&self, vehicle_id: uuid::Uuid) -> Result<(), VehicleRepositoryError>;
}
