use crate::domain::entities::job::{Job, JobPhase, JobPriority, JobStatus, ServiceItem};
use crate::domain::entities::task::{TaskKey, TaskStatus};
use crate::domain::value_objects::ids::{JobId, ScopeId, TaskId, VehicleId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::checklist::ChecklistTracker;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Element of the `services` jsonb column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItemRow {
    #[serde(default)]
    pub id: Option<uuid::Uuid>,
    pub name: String,
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub estimate: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRow {
    pub id: uuid::Uuid,
    pub scope_id: uuid::Uuid,
    pub job_number: String,
    pub status: String,
    pub priority: Option<String>,
    pub work_completed: bool,
    pub quality_check_completed: bool,
    pub delivery_completed: bool,
    pub assigned_technician: Option<String>,
    pub vehicle_id: Option<uuid::Uuid>,
    pub customer_name: Option<String>,
    pub vehicle_label: Option<String>,
    pub services: Json<Vec<ServiceItemRow>>,
    pub task_statuses: Json<BTreeMap<String, String>>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl JobRow {
    pub fn from_job(job: &Job) -> Self {
        Self {
            id: job.id.0,
            scope_id: job.scope_id.0,
            job_number: job.job_number.clone(),
            status: job.status.phase().as_str().to_string(),
            priority: Some(job.priority.as_str().to_string()),
            work_completed: job.work_completed(),
            quality_check_completed: job.quality_check_completed(),
            delivery_completed: job.delivery_completed(),
            assigned_technician: job.assigned_technician.clone(),
            vehicle_id: job.vehicle_id.map(|v| v.0),
            customer_name: Some(job.customer_name.clone()),
            vehicle_label: Some(job.vehicle_label.clone()),
            services: Json(
                job.services
                    .iter()
                    .map(|s| ServiceItemRow {
                        id: s.id.map(|id| id.0),
                        name: s.name.clone(),
                        cost: s.cost.minor_signed(),
                        estimate: Some(s.estimate.clone()),
                    })
                    .collect(),
            ),
            task_statuses: Json(
                job.tasks
                    .iter()
                    .map(|(k, v)| (k.as_str().to_string(), v.as_str().to_string()))
                    .collect(),
            ),
            notes: job.notes.clone(),
            created_at: job.created_at.as_inner(),
            updated_at: job.updated_at.as_inner(),
        }
    }

    /// Map a stored row to the entity, substituting defaults for anything missing or unknown.
    pub fn into_job(self) -> Job {
        let phase = JobPhase::parse(&self.status).unwrap_or(JobPhase::Pending);
        let priority = match self.priority.as_deref() {
            Some(p) => JobPriority::parse(p),
            None => JobPriority::parse(&self.status),
        };
        let assigned_technician = self
            .assigned_technician
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case("unassigned"));

        let mut job = Job {
            id: JobId(self.id),
            job_number: self.job_number,
            scope_id: ScopeId(self.scope_id),
            status: JobStatus::from_parts(
                phase,
                self.work_completed,
                self.quality_check_completed,
            ),
            priority,
            assigned_technician,
            vehicle_id: self.vehicle_id.map(VehicleId),
            customer_name: self.customer_name.unwrap_or_default(),
            vehicle_label: self.vehicle_label.unwrap_or_default(),
            services: self
                .services
                .0
                .into_iter()
                .map(|s| ServiceItem {
                    id: s.id.map(TaskId),
                    name: s.name,
                    cost: Money::from_minor_signed(s.cost),
                    estimate: s.estimate.unwrap_or_default(),
                })
                .collect(),
            tasks: self
                .task_statuses
                .0
                .into_iter()
                .map(|(k, v)| (TaskKey::new(k), TaskStatus::parse(&v).unwrap_or_default()))
                .collect(),
            notes: self.notes,
            created_at: Timestamp::from(self.created_at),
            updated_at: Timestamp::from(self.updated_at),
        };
        ChecklistTracker::prune(&mut job);
        job
    }
}
