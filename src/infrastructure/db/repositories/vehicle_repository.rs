use crate::domain::entities::vehicle::Vehicle;
use crate::domain::value_objects::ids::{ScopeId, VehicleId};
use crate::infrastructure::db::dto::VehicleRow;
use crate::infrastructure::db::stores::vehicle_store::{VehicleRepositoryError, VehicleStore};
use std::sync::Arc;

pub struct VehicleRepository {
    store: Arc<dyn VehicleStore>,
}

impl VehicleRepository {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }

    pub async fn get(
        &self,
        vehicle_id: VehicleId,
    ) -> Result<Option<Vehicle>, VehicleRepositoryError> {
        let row = self.store.get(vehicle_id.0).await?;
        Ok(row.map(VehicleRow::into_vehicle))
    }

    pub async fn list_by_scope(
        &self,
        scope_id: ScopeId,
    ) -> Result<Vec<Vehicle>, VehicleRepositoryError> {
        let rows = self.store.list_by_scope(scope_id.0).await?;
        Ok(rows.into_iter().map(VehicleRow::into_vehicle).collect())
    }

    pub async fn insert(&self, vehicle: &Vehicle) -> Result<Vehicle, VehicleRepositoryError> {
        let stored = self.store.insert(&VehicleRow::from_vehicle(vehicle)).await?;
        Ok(stored.into_vehicle())
    }

    pub async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, VehicleRepositoryError> {
        let stored = self.store.update(&VehicleRow::from_vehicle(vehicle)).await?;
        Ok(stored.into_vehicle())
    }

    pub async fn delete(&self, vehicle_id: VehicleId) -> Result<(), VehicleRepositoryError> {
        self.store.delete(vehicle_id.0).await
    }
}
