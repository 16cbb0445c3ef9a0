use crate::infrastructure::db::dto::VehicleRow;
use crate::infrastructure::db::stores::vehicle_store::{VehicleRepositoryError, VehicleStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryVehicleStore {
    rows: RwLock<HashMap<uuid::Uuid, VehicleRow>>,
    offline: AtomicBool,
}

impl MemoryVehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: impl IntoIterator<Item = VehicleRow>) -> Self {
        let mut store = Self::new();
        *store.rows.get_mut() = rows.into_iter().map(|r| (r.id, r)).collect();
        store
    }

    /// Simulate the backend being unreachable for every call.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), VehicleRepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(VehicleRepositoryError::StorageUnavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl VehicleStore for MemoryVehicleStore {
    async fn get(
        &self,
        vehicle_id: uuid::Uuid,
    ) -> Result<Option<VehicleRow>, VehicleRepositoryError> {
        self.check()?;
        Ok(self.rows.read().await.get(&vehicle_id).cloned())
    }

    async fn list_by_scope(
        &self,
        scope_id: uuid::Uuid,
    ) -> Result<Vec<VehicleRow>, VehicleRepositoryError> {
        self.check()?;
        let mut rows: Vec<VehicleRow> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| r.scope_id == scope_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(rows)
    }

    async fn insert(&self, row: &VehicleRow) -> Result<VehicleRow, VehicleRepositoryError> {
        self.check()?;
        let mut rows = self.rows.write().await;
        if rows.contains_key(&row.id) {
            return Err(VehicleRepositoryError::Conflict);
        }
        rows.insert(row.id, row.clone());
        Ok(row.clone())
    }

    async fn update(&self, row: &VehicleRow) -> Result<VehicleRow, VehicleRepositoryError> {
        self.check()?;
        let mut rows = self.rows.write().await;
        let Some(existing) = rows.get_mut(&row.id) else {
            return Err(VehicleRepositoryError::NotFound);
        };
        existing.assigned_technician = row.assigned_technician.clone();
        existing.status = row.status.clone();
        existing.tasks = row.tasks.clone();
        existing.updated_at = row.updated_at;
        Ok(existing.clone())
    }

    async fn delete(&self, vehicle_id: uuid::Uuid) -> Result<(), VehicleRepositoryError> {
        self.check()?;
        match self.rows.write().await.remove(&vehicle_id) {
            Some(_) => Ok(()),
            None => Err(VehicleRepositoryError::NotFound),
        }
    }
}
