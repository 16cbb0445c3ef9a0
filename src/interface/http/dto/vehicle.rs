use crate::application::services::vehicle_service::{VehicleList, VehicleSource};
use crate::domain::entities::vehicle::Vehicle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VehicleListQuery {
    pub technician: String,
}

#[derive(Debug, Deserialize)]
pub struct VehicleStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct VehicleTaskStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct VehicleTaskResponse {
    pub task_id: String,
    pub name: String,
    pub cost: u64,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub vehicle_id: String,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub owner_name: String,
    pub assigned_technician: Option<String>,
    pub status: String,
    pub status_label: String,
    pub open_tasks: usize,
    pub tasks: Vec<VehicleTaskResponse>,
    pub updated_at: String,
}

impl From<&Vehicle> for VehicleResponse {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_id: vehicle.id.to_string(),
            plate: vehicle.plate.clone(),
            make: vehicle.make.clone(),
            model: vehicle.model.clone(),
            owner_name: vehicle.owner_name.clone(),
            assigned_technician: vehicle.assigned_technician.clone(),
            status: vehicle.status.as_str().to_string(),
            status_label: vehicle.status.display_name().to_string(),
            open_tasks: vehicle.unsettled_tasks(),
            tasks: vehicle
                .tasks
                .iter()
                .map(|t| VehicleTaskResponse {
                    task_id: t.id.to_string(),
                    name: t.name.clone(),
                    cost: t.cost.minor(),
                    status: t.status.as_str().to_string(),
                })
                .collect(),
            updated_at: vehicle.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    /// `remote`, or `mirror` when served from the offline copy.
    pub source: &'static str,
    pub vehicles: Vec<VehicleResponse>,
}

impl From<&VehicleList> for VehicleListResponse {
    fn from(list: &VehicleList) -> Self {
        Self {
            source: match list.source {
                VehicleSource::Remote => "remote",
                VehicleSource::Mirror => "mirror",
            },
            vehicles: list.vehicles.iter().map(VehicleResponse::from).collect(),
        }
    }
}
