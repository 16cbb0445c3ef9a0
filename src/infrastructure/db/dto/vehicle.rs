use crate::domain::entities::vehicle::{Vehicle, VehicleStatus, VehicleTask, VehicleTaskStatus};
use crate::domain::value_objects::ids::{ScopeId, TaskId, VehicleId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::timestamps::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTaskRow {
    pub id: uuid::Uuid,
    pub name: String,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VehicleRow {
    pub id: uuid::Uuid,
    pub scope_id: uuid::Uuid,
    pub plate: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub owner_name: Option<String>,
    pub assigned_technician: Option<String>,
    pub status: String,
    pub tasks: Json<Vec<VehicleTaskRow>>,
    pub updated_at: OffsetDateTime,
}

impl VehicleRow {
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.0,
            scope_id: vehicle.scope_id.0,
            plate: vehicle.plate.clone(),
            make: Some(vehicle.make.clone()),
            model: Some(vehicle.model.clone()),
            owner_name: Some(vehicle.owner_name.clone()),
            assigned_technician: vehicle.assigned_technician.clone(),
            status: vehicle.status.as_str().to_string(),
            tasks: Json(
                vehicle
                    .tasks
                    .iter()
                    .map(|t| VehicleTaskRow {
                        id: t.id.0,
                        name: t.name.clone(),
                        cost: t.cost.minor_signed(),
                        status: t.status.as_str().to_string(),
                    })
                    .collect(),
            ),
            updated_at: vehicle.updated_at.as_inner(),
        }
    }

    pub fn into_vehicle(self) -> Vehicle {
        Vehicle {
            id: VehicleId(self.id),
            scope_id: ScopeId(self.scope_id),
            plate: self.plate,
            make: self.make.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            owner_name: self.owner_name.unwrap_or_default(),
            assigned_technician: self.assigned_technician.filter(|t| !t.trim().is_empty()),
            status: VehicleStatus::parse(&self.status).unwrap_or(VehicleStatus::Scheduled),
            tasks: self
                .tasks
                .0
                .into_iter()
                .map(|t| VehicleTask {
                    id: TaskId(t.id),
                    name: t.name,
                    cost: Money::from_minor_signed(t.cost),
                    status: VehicleTaskStatus::parse(&t.status).unwrap_or_default(),
                })
                .collect(),
            updated_at: Timestamp::from(self.updated_at),
        }
    }
}
