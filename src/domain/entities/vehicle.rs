use crate::domain::value_objects::ids::{ScopeId, TaskId, VehicleId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::timestamps::Timestamp;
use serde::{Deserialize, Serialize};

/// Technician-facing shop status. Unrelated to `JobStatus`; the two are never reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Scheduled,
    InShop,
    Ready,
    Completed,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Scheduled => "scheduled",
            VehicleStatus::InShop => "in_shop",
            VehicleStatus::Ready => "ready",
            VehicleStatus::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VehicleStatus::Scheduled => "Scheduled",
            VehicleStatus::InShop => "In Shop",
            VehicleStatus::Ready => "Ready",
            VehicleStatus::Completed => "Completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "scheduled" => Some(VehicleStatus::Scheduled),
            "in_shop" | "inshop" => Some(VehicleStatus::InShop),
            "ready" => Some(VehicleStatus::Ready),
            "completed" => Some(VehicleStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleTaskStatus {
    #[default]
    Pending,
    InProgress,
    NeedApproval,
    Completed,
    Rejected,
}

impl VehicleTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleTaskStatus::Pending => "pending",
            VehicleTaskStatus::InProgress => "in_progress",
            VehicleTaskStatus::NeedApproval => "need_approval",
            VehicleTaskStatus::Completed => "completed",
            VehicleTaskStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "pending" => Some(VehicleTaskStatus::Pending),
            "in_progress" => Some(VehicleTaskStatus::InProgress),
            "need_approval" | "needs_approval" => Some(VehicleTaskStatus::NeedApproval),
            "completed" | "complete" => Some(VehicleTaskStatus::Completed),
            "rejected" => Some(VehicleTaskStatus::Rejected),
            _ => None,
        }
    }

    /// Completed or rejected; nothing left for the technician to do.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            VehicleTaskStatus::Completed | VehicleTaskStatus::Rejected
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleTask {
    pub id: TaskId,
    pub name: String,
    pub cost: Money,
    pub status: VehicleTaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub scope_id: ScopeId,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub owner_name: String,
    pub assigned_technician: Option<String>,
    pub status: VehicleStatus,
    pub tasks: Vec<VehicleTask>,
    pub updated_at: Timestamp,
}

impl Vehicle {
    pub fn task(&self, task_id: TaskId) -> Option<&VehicleTask> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> Option<&mut VehicleTask> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }

    pub fn unsettled_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.status.is_settled()).count()
    }

    pub fn is_assigned_to(&self, technician: &str) -> bool {
        self.assigned_technician
            .as_deref()
            .is_some_and(|name| name.trim().eq_ignore_ascii_case(technician.trim()))
    }

    pub fn touch(&mut self) {
        self.updated_at = Timestamp::now_utc();
    }
}
