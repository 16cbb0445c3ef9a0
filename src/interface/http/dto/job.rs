use crate::application::services::job_board::{CommandOutcome, DashboardSummary};
use crate::domain::entities::job::Job;
use crate::domain::workflows::bucket::Bucket;
use crate::domain::workflows::checklist::ChecklistTracker;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ServiceItemRequest {
    pub name: String,
    /// Minor currency units; negative values are clamped to zero.
    #[serde(default)]
    pub cost: i64,
    #[serde(default)]
    pub estimate: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub job_number: String,
    pub customer_name: String,
    #[serde(default)]
    pub vehicle_label: Option<String>,
    #[serde(default)]
    pub services: Vec<ServiceItemRequest>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub technician: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceItemResponse {
    pub key: String,
    pub id: Option<String>,
    pub name: String,
    pub cost: u64,
    pub estimate: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job_id: String,
    pub job_number: String,
    pub status: String,
    pub status_label: String,
    pub bucket: Option<String>,
    pub priority: String,
    pub work_completed: bool,
    pub quality_check_completed: bool,
    pub delivery_completed: bool,
    pub assigned_technician: String,
    pub customer_name: String,
    pub vehicle_label: String,
    pub vehicle_id: Option<String>,
    pub services: Vec<ServiceItemResponse>,
    pub progress: f64,
    pub progress_label: String,
    pub total_cost: u64,
    pub total_cost_label: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl JobResponse {
    pub fn from_job(job: &Job, currency_symbol: &str) -> Self {
        let total = job.total_cost();
        Self {
            job_id: job.id.to_string(),
            job_number: job.job_number.clone(),
            status: job.status.phase().as_str().to_string(),
            status_label: job.status.phase().display_name().to_string(),
            bucket: Bucket::of(job).map(|b| b.as_str().to_string()),
            priority: job.priority.as_str().to_string(),
            work_completed: job.work_completed(),
            quality_check_completed: job.quality_check_completed(),
            delivery_completed: job.delivery_completed(),
            assigned_technician: job.technician_label().to_string(),
            customer_name: job.customer_name.clone(),
            vehicle_label: job.vehicle_label.clone(),
            vehicle_id: job.vehicle_id.map(|v| v.to_string()),
            services: job
                .services
                .iter()
                .map(|s| ServiceItemResponse {
                    key: s.key().to_string(),
                    id: s.id.map(|id| id.to_string()),
                    name: s.name.clone(),
                    cost: s.cost.minor(),
                    estimate: s.estimate.clone(),
                    status: job.tasks.status_of(&s.key()).as_str().to_string(),
                })
                .collect(),
            progress: ChecklistTracker::progress_ratio(job),
            progress_label: ChecklistTracker::progress_label(job),
            total_cost: total.minor(),
            total_cost_label: total.format(currency_symbol),
            notes: job.notes.clone(),
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub from: String,
    pub to: String,
    pub cascaded: bool,
    pub job: JobResponse,
}

impl TransitionResponse {
    pub fn from_outcome(outcome: &CommandOutcome, currency_symbol: &str) -> Self {
        Self {
            from: outcome.transition.from.phase().as_str().to_string(),
            to: outcome.transition.to.phase().as_str().to_string(),
            cascaded: outcome.transition.cascaded,
            job: JobResponse::from_job(&outcome.job, currency_symbol),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobResponse>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub pending: usize,
    pub active: usize,
    pub done: usize,
    pub delivered: usize,
    pub revenue: u64,
    pub revenue_label: String,
}

impl From<DashboardSummary> for DashboardResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            pending: summary.pending,
            active: summary.active,
            done: summary.done,
            delivered: summary.delivered,
            revenue: summary.revenue.minor(),
            revenue_label: summary.revenue_label,
        }
    }
}
