use crate::domain::entities::job::Job;
use crate::domain::entities::task::TaskStatus;

/// Aggregates over a job's task checklist.
///
/// Only tasks present in the job's service list are counted. A service without a checklist
/// entry counts as pending. A job with no tasks is vacuously resolved but reports zero
/// progress; callers must not read one as the other.
pub struct ChecklistTracker;

impl ChecklistTracker {
    fn statuses(job: &Job) -> impl Iterator<Item = TaskStatus> + '_ {
        job.task_keys().map(|key| job.tasks.status_of(&key))
    }

    /// Share of tasks marked complete, in `[0, 1]`. `0.0` when the job has no tasks.
    pub fn progress_ratio(job: &Job) -> f64 {
        let total = job.services.len();
        if total == 0 {
            return 0.0;
        }
        Self::completed_count(job) as f64 / total as f64
    }

    pub fn completed_count(job: &Job) -> usize {
        Self::statuses(job)
            .filter(|s| *s == TaskStatus::Complete)
            .count()
    }

    pub fn unresolved_count(job: &Job) -> usize {
        Self::statuses(job).filter(|s| !s.is_resolved()).count()
    }

    pub fn approval_count(job: &Job) -> usize {
        Self::statuses(job)
            .filter(|s| *s == TaskStatus::NeedsApproval)
            .count()
    }

    pub fn all_resolved(job: &Job) -> bool {
        Self::unresolved_count(job) == 0
    }

    pub fn has_outstanding_approval(job: &Job) -> bool {
        Self::approval_count(job) > 0
    }

    /// Card counter such as `2/4`.
    pub fn progress_label(job: &Job) -> String {
        format!("{}/{}", Self::completed_count(job), job.services.len())
    }

    /// Drop checklist entries that no longer match a service item.
    pub fn prune(job: &mut Job) {
        let keys: Vec<_> = job.task_keys().collect();
        job.tasks.retain(|key| keys.contains(key));
    }
}
