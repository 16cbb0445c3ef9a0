use crate::domain::entities::task::{TaskChecklist, TaskKey, TaskStatus};
use crate::domain::value_objects::ids::{JobId, ScopeId, TaskId, VehicleId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::timestamps::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Flag-free discriminant of `JobStatus`, used by the transition matrix and for bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPhase {
    Pending,
    Active,
    Done,
    Delivered,
}

impl JobPhase {
    /// Case-insensitive, alias-tolerant parse of display and wire spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" | "waiting" => Some(JobPhase::Pending),
            "active" | "progress" | "in_progress" | "inprogress" | "urgent" => {
                Some(JobPhase::Active)
            }
            "done" | "completed" => Some(JobPhase::Done),
            "delivered" => Some(JobPhase::Delivered),
            _ => None,
        }
    }

    /// Backend vocabulary.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPhase::Pending => "pending",
            JobPhase::Active => "in_progress",
            JobPhase::Done => "completed",
            JobPhase::Delivered => "delivered",
        }
    }

    /// Vocabulary shown on badges and tabs.
    pub fn display_name(&self) -> &'static str {
        match self {
            JobPhase::Pending => "Pending",
            JobPhase::Active => "Progress",
            JobPhase::Done => "Done",
            JobPhase::Delivered => "Delivered",
        }
    }
}

/// Lifecycle status. Completion flags are implied by the variant and exposed as accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Active {
        work_completed: bool,
        quality_check_completed: bool,
    },
    Done,
    Delivered,
}

impl JobStatus {
    pub const ACTIVE: JobStatus = JobStatus::Active {
        work_completed: false,
        quality_check_completed: false,
    };

    /// Rebuild a status from the stored phase and flags. Flags only matter while active.
    /// Rebuild a status from stored parts. An active job with both flags set is `Done`.
    pub fn from_parts(
        phase: JobPhase,
        work_completed: bool,
        quality_check_completed: bool,
    ) -> Self {
        match phase {
            JobPhase::Pending => JobStatus::Pending,
            JobPhase::Active if work_completed && quality_check_completed => JobStatus::Done,
            JobPhase::Active => JobStatus::Active {
                work_completed,
                quality_check_completed,
            },
            JobPhase::Done => JobStatus::Done,
            JobPhase::Delivered => JobStatus::Delivered,
        }
    }

    pub fn phase(&self) -> JobPhase {
        match self {
            JobStatus::Pending => JobPhase::Pending,
            JobStatus::Active { .. } => JobPhase::Active,
            JobStatus::Done => JobPhase::Done,
            JobStatus::Delivered => JobPhase::Delivered,
        }
    }

    pub fn work_completed(&self) -> bool {
        match self {
            JobStatus::Pending => false,
            JobStatus::Active { work_completed, .. } => *work_completed,
            JobStatus::Done | JobStatus::Delivered => true,
        }
    }

    pub fn quality_check_completed(&self) -> bool {
        match self {
            JobStatus::Pending => false,
            JobStatus::Active {
                quality_check_completed,
                ..
            } => *quality_check_completed,
            JobStatus::Done | JobStatus::Delivered => true,
        }
    }

    pub fn delivery_completed(&self) -> bool {
        matches!(self, JobStatus::Delivered)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPriority {
    #[default]
    Normal,
    Urgent,
}

impl JobPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobPriority::Normal => "normal",
            JobPriority::Urgent => "urgent",
        }
    }

    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("urgent") {
            JobPriority::Urgent
        } else {
            JobPriority::Normal
        }
    }
}

/// One billable/workable unit within a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    pub id: Option<TaskId>,
    pub name: String,
    pub cost: Money,
    pub estimate: String,
}

impl ServiceItem {
    pub fn new(name: impl Into<String>, cost: Money, estimate: impl Into<String>) -> Self {
        Self {
            id: Some(TaskId::new()),
            name: name.into(),
            cost,
            estimate: estimate.into(),
        }
    }

    pub fn key(&self) -> TaskKey {
        match self.id {
            Some(id) => TaskKey::new(id.to_string()),
            None => TaskKey::new(self.name.clone()),
        }
    }

    /// Clients address tasks either by id or by name.
    pub fn matches(&self, key: &TaskKey) -> bool {
        self.id.is_some_and(|id| id.to_string() == key.as_str()) || self.name == key.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JobValidationError {
    #[error("job number must not be blank")]
    EmptyJobNumber,
    #[error("service name must not be blank")]
    EmptyTaskName,
    #[error("services must have distinct names and ids")]
    DuplicateTask,
}

/// One vehicle's service engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub job_number: String,
    pub scope_id: ScopeId,
    pub status: JobStatus,
    pub priority: JobPriority,
    pub assigned_technician: Option<String>,
    pub vehicle_id: Option<VehicleId>,
    pub customer_name: String,
    pub vehicle_label: String,
    pub services: Vec<ServiceItem>,
    pub tasks: TaskChecklist,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Build a new pending job; every service item starts with a pending task entry.
    pub fn new(
        scope_id: ScopeId,
        job_number: impl Into<String>,
        customer_name: impl Into<String>,
        vehicle_label: impl Into<String>,
        services: Vec<ServiceItem>,
    ) -> Result<Self, JobValidationError> {
        let job_number = job_number.into();
        if job_number.trim().is_empty() {
            return Err(JobValidationError::EmptyJobNumber);
        }
        if services.iter().any(|s| s.name.trim().is_empty()) {
            return Err(JobValidationError::EmptyTaskName);
        }
        // Tasks are addressed by id or by name, so both must be unique.
        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for service in &services {
            if !keys.insert(service.key()) || !names.insert(service.name.as_str()) {
                return Err(JobValidationError::DuplicateTask);
            }
        }

        let now = Timestamp::now_utc();
        let tasks = services
            .iter()
            .map(|s| (s.key(), TaskStatus::Pending))
            .collect();
        Ok(Self {
            id: JobId::new(),
            job_number,
            scope_id,
            status: JobStatus::Pending,
            priority: JobPriority::Normal,
            assigned_technician: None,
            vehicle_id: None,
            customer_name: customer_name.into(),
            vehicle_label: vehicle_label.into(),
            services,
            tasks,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Canonical key of the service item addressed by `key` (id or name), if any.
    pub fn resolve_task(&self, key: &TaskKey) -> Option<TaskKey> {
        self.services
            .iter()
            .find(|s| s.matches(key))
            .map(ServiceItem::key)
    }

    pub fn task_keys(&self) -> impl Iterator<Item = TaskKey> + '_ {
        self.services.iter().map(ServiceItem::key)
    }

    pub fn total_cost(&self) -> Money {
        self.services.iter().map(|s| s.cost).sum()
    }

    pub fn technician_label(&self) -> &str {
        self.assigned_technician.as_deref().unwrap_or("Unassigned")
    }

    pub fn work_completed(&self) -> bool {
        self.status.work_completed()
    }

    pub fn quality_check_completed(&self) -> bool {
        self.status.quality_check_completed()
    }

    pub fn delivery_completed(&self) -> bool {
        self.status.delivery_completed()
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now_utc();
    }
}
