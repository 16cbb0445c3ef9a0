// Application service: technician-facing vehicle flows with an offline mirror.

use crate::domain::entities::vehicle::{Vehicle, VehicleStatus, VehicleTaskStatus};
use crate::domain::value_objects::ids::{ScopeId, TaskId, VehicleId};
use crate::domain::workflows::vehicle_state_machine::{VehicleStateMachine, VehicleTransitionError};
use crate::infrastructure::db::repositories::vehicle_repository::VehicleRepository;
use crate::infrastructure::db::stores::vehicle_store::VehicleRepositoryError;
use crate::infrastructure::local::LocalStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VehicleServiceError {
    NotFound,
    UnknownTask(TaskId),
    Transition(VehicleTransitionError),
    Persistence(VehicleRepositoryError),
}

/// Where a vehicle list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleSource {
    Remote,
    /// Remote read failed; served from the local mirror.
    Mirror,
}

#[derive(Debug, Clone)]
pub struct VehicleList {
    pub vehicles: Vec<Vehicle>,
    pub source: VehicleSource,
}

pub struct VehicleService {
    repo: Arc<VehicleRepository>,
    local: LocalStore,
    scope_id: ScopeId,
    cache_key: String,
    last_technician: Mutex<Option<String>>,
}

impl VehicleService {
    pub fn new(
        repo: Arc<VehicleRepository>,
        local: LocalStore,
        scope_id: ScopeId,
        cache_key: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            local,
            scope_id,
            cache_key: cache_key.into(),
            last_technician: Mutex::new(None),
        }
    }

    /// Vehicles assigned to `technician`, mirrored locally.
    /// The mirror answers when the remote is down.
    #[instrument(skip(self))]
    pub async fn load_vehicles(&self, technician: &str) -> VehicleList {
        // Step 1: Remember who is looking so change notices can refresh the same view.
        *self.last_technician.lock().await = Some(technician.to_string());

        // Step 2: Read the remote set and mirror it.
        match self.repo.list_by_scope(self.scope_id).await {
            Ok(all) => {
                let vehicles: Vec<Vehicle> = all
                    .into_iter()
                    .filter(|v| v.is_assigned_to(technician))
                    .collect();
                self.local.save(&self.cache_key, &vehicles).await;
                info!(count = vehicles.len(), "vehicles_loaded");
                VehicleList {
                    vehicles,
                    source: VehicleSource::Remote,
                }
            }
            // Step 3: Fall back to whatever the mirror holds for this technician.
            Err(err) => {
                warn!(error = ?err, "vehicle_load_failed_using_mirror");
                let vehicles = self
                    .local
                    .load::<Vec<Vehicle>>(&self.cache_key)
                    .await
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|v| v.is_assigned_to(technician))
                    .collect();
                VehicleList {
                    vehicles,
                    source: VehicleSource::Mirror,
                }
            }
        }
    }

    /// Reload for the technician who last loaded vehicles, if any.
    pub async fn refresh(&self) -> Option<VehicleList> {
        let technician = self.last_technician.lock().await.clone()?;
        Some(self.load_vehicles(&technician).await)
    }

    #[instrument(skip(self), fields(vehicle_id = %vehicle_id))]
    pub async fn update_status(
        &self,
        vehicle_id: VehicleId,
        status: VehicleStatus,
    ) -> Result<Vehicle, VehicleServiceError> {
        // Step 1: Fetch and validate the move.
        let mut vehicle = self.fetch(vehicle_id).await?;
        let from = vehicle.status;
        let to = VehicleStateMachine::transition(&vehicle, status)
            .map_err(VehicleServiceError::Transition)?;

        // Step 2: Apply, write through and refresh the mirror.
        vehicle.status = to;
        vehicle.touch();
        let stored = self.write(&vehicle).await?;
        info!(from = from.as_str(), to = to.as_str(), "vehicle_status_updated");
        Ok(stored)
    }

    #[instrument(skip(self), fields(vehicle_id = %vehicle_id, task_id = %task_id))]
    pub async fn update_task_status(
        &self,
        vehicle_id: VehicleId,
        task_id: TaskId,
        status: VehicleTaskStatus,
    ) -> Result<Vehicle, VehicleServiceError> {
        let mut vehicle = self.fetch(vehicle_id).await?;
        if vehicle.status == VehicleStatus::Completed {
            return Err(VehicleServiceError::Transition(VehicleTransitionError::Closed));
        }
        let task = vehicle
            .task_mut(task_id)
            .ok_or(VehicleServiceError::UnknownTask(task_id))?;
        task.status = status;

        // A ready vehicle with an open task goes back into the shop.
        if vehicle.status == VehicleStatus::Ready && !status.is_settled() {
            vehicle.status = VehicleStateMachine::transition(&vehicle, VehicleStatus::InShop)
                .map_err(VehicleServiceError::Transition)?;
            info!(from = "ready", to = "in_shop", "vehicle_reopened");
        }
        vehicle.touch();
        let stored = self.write(&vehicle).await?;
        info!(status = status.as_str(), "vehicle_task_updated");
        Ok(stored)
    }

    async fn fetch(&self, vehicle_id: VehicleId) -> Result<Vehicle, VehicleServiceError> {
        self.repo
            .get(vehicle_id)
            .await
            .map_err(VehicleServiceError::Persistence)?
            .ok_or(VehicleServiceError::NotFound)
    }

    async fn write(&self, vehicle: &Vehicle) -> Result<Vehicle, VehicleServiceError> {
        let stored = self.repo.update(vehicle).await.map_err(|err| {
            warn!(error = ?err, "vehicle_write_failed");
            match err {
                VehicleRepositoryError::NotFound => VehicleServiceError::NotFound,
                other => VehicleServiceError::Persistence(other),
            }
        })?;
        self.mirror_one(&stored).await;
        Ok(stored)
    }

    /// Replace the mirrored copy of `vehicle`, dropping it if no longer assigned to the viewer.
    async fn mirror_one(&self, vehicle: &Vehicle) {
        let Some(mut mirrored) = self.local.load::<Vec<Vehicle>>(&self.cache_key).await else {
            return;
        };
        let viewer = self.last_technician.lock().await.clone();
        mirrored.retain(|v| v.id != vehicle.id);
        let keep = match viewer {
            Some(technician) => vehicle.is_assigned_to(&technician),
            None => true,
        };
        if keep {
            mirrored.push(vehicle.clone());
        }
        self.local.save(&self.cache_key, &mirrored).await;
    }
}
