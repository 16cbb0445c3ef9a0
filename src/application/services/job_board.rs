// Application service: in-memory job board over the remote job repository.

use crate::domain::entities::job::{Job, JobPriority, JobStatus, JobValidationError, ServiceItem};
use crate::domain::entities::task::{TaskChecklist, TaskKey, TaskStatus};
use crate::domain::services::job_lifecycle::{JobCommand, JobLifecycleService, Transition};
use crate::domain::value_objects::ids::{JobId, ScopeId, VehicleId};
use crate::domain::value_objects::money::Money;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::domain::workflows::bucket::Bucket;
use crate::domain::workflows::state_machine::TransitionError;
use crate::infrastructure::db::repositories::job_repository::JobRepository;
use crate::infrastructure::db::stores::job_store::JobRepositoryError;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    NotFound,
    /// A previous write for the same job has not resolved yet.
    WriteInFlight,
    Transition(TransitionError),
    Validation(JobValidationError),
    Persistence(JobRepositoryError),
}

/// Field-level changes merged into a cached job ahead of the remote write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub assigned_technician: Option<Option<String>>,
    pub tasks: Option<TaskChecklist>,
    pub notes: Option<Option<String>>,
    pub updated_at: Option<Timestamp>,
}

impl JobPatch {
    /// The patch that turns `before` into `after` for the mutable fields.
    pub fn between(before: &Job, after: &Job) -> Self {
        Self {
            status: (before.status != after.status).then_some(after.status),
            assigned_technician: (before.assigned_technician != after.assigned_technician)
                .then(|| after.assigned_technician.clone()),
            tasks: (before.tasks != after.tasks).then(|| after.tasks.clone()),
            notes: (before.notes != after.notes).then(|| after.notes.clone()),
            updated_at: (before.updated_at != after.updated_at).then_some(after.updated_at),
        }
    }

    pub fn apply_to(&self, job: &mut Job) {
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(technician) = &self.assigned_technician {
            job.assigned_technician = technician.clone();
        }
        if let Some(tasks) = &self.tasks {
            job.tasks = tasks.clone();
        }
        if let Some(notes) = &self.notes {
            job.notes = notes.clone();
        }
        if let Some(updated_at) = self.updated_at {
            job.updated_at = updated_at;
        }
    }
}

/// Input for creating a job on the board.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_number: String,
    pub customer_name: String,
    pub vehicle_label: String,
    pub services: Vec<ServiceItem>,
    pub priority: JobPriority,
    pub vehicle_id: Option<VehicleId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub job: Job,
    pub transition: Transition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub pending: usize,
    pub active: usize,
    pub done: usize,
    pub delivered: usize,
    pub revenue: Money,
    pub revenue_label: String,
}

#[derive(Default)]
struct BoardState {
    jobs: HashMap<JobId, Job>,
    /// Jobs with a write outstanding, keyed to their last confirmed copy.
    in_flight: HashMap<JobId, Job>,
}

fn sorted(mut jobs: Vec<Job>) -> Vec<Job> {
    jobs.sort_by(|a, b| {
        a.job_number
            .cmp(&b.job_number)
            .then(a.created_at.cmp(&b.created_at))
    });
    jobs
}

fn stage(state: &mut BoardState, job_id: JobId, patch: &JobPatch) -> Result<Job, BoardError> {
    if state.in_flight.contains_key(&job_id) {
        return Err(BoardError::WriteInFlight);
    }
    let job = state.jobs.get_mut(&job_id).ok_or(BoardError::NotFound)?;
    let snapshot = job.clone();
    patch.apply_to(job);
    let staged = job.clone();
    state.in_flight.insert(job_id, snapshot);
    Ok(staged)
}

/// Scope-wide job set kept in memory, written through to the remote store.
pub struct JobBoard {
    repo: Arc<JobRepository>,
    lifecycle: Arc<dyn JobLifecycleService>,
    scope_id: ScopeId,
    currency_symbol: String,
    state: RwLock<BoardState>,
}

impl JobBoard {
    pub fn new(
        repo: Arc<JobRepository>,
        lifecycle: Arc<dyn JobLifecycleService>,
        scope_id: ScopeId,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            lifecycle,
            scope_id,
            currency_symbol: currency_symbol.into(),
            state: RwLock::new(BoardState::default()),
        }
    }

    pub fn scope_id(&self) -> ScopeId {
        self.scope_id
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    /// Reload the scope from the remote store, surfacing the failure.
    #[instrument(skip(self), fields(scope_id = %self.scope_id))]
    pub async fn try_load_all(&self) -> Result<Vec<Job>, JobRepositoryError> {
        // Step 1: Fetch outside the lock.
        let fetched = self.repo.list_by_scope(self.scope_id).await?;

        // Step 2: Replace the set; records with a write in flight keep their staged copy.
        let mut state = self.state.write().await;
        let mut jobs: HashMap<JobId, Job> = fetched.into_iter().map(|j| (j.id, j)).collect();
        for id in state.in_flight.keys() {
            if let Some(staged) = state.jobs.get(id) {
                jobs.insert(*id, staged.clone());
            }
        }
        state.jobs = jobs;
        info!(count = state.jobs.len(), "job_board_loaded");
        Ok(sorted(state.jobs.values().cloned().collect()))
    }

    /// Reload the scope; on failure the previous set is kept and returned.
    pub async fn load_all(&self) -> Vec<Job> {
        match self.try_load_all().await {
            Ok(jobs) => jobs,
            Err(err) => {
                warn!(error = ?err, "job_board_load_failed");
                self.all().await
            }
        }
    }

    /// Same as `load_all`; invoked on every change notice.
    pub async fn refresh(&self) -> Vec<Job> {
        self.load_all().await
    }

    /// Merge `patch` into the cached job and mark it as having a write in flight.
    pub async fn apply_optimistic(
        &self,
        job_id: JobId,
        patch: &JobPatch,
    ) -> Result<Job, BoardError> {
        let mut state = self.state.write().await;
        stage(&mut state, job_id, patch)
    }

    /// Accept the stored copy of a job whose write succeeded.
    pub async fn confirm_write(&self, stored: Job) {
        let mut state = self.state.write().await;
        state.in_flight.remove(&stored.id);
        state.jobs.insert(stored.id, stored);
    }

    /// Undo the optimistic change for `job_id` and resynchronise with the remote store.
    pub async fn revert_on_failure(&self, job_id: JobId) -> Vec<Job> {
        {
            let mut state = self.state.write().await;
            if let Some(snapshot) = state.in_flight.remove(&job_id) {
                state.jobs.insert(job_id, snapshot);
            }
        }
        self.load_all().await
    }

    pub async fn get(&self, job_id: JobId) -> Option<Job> {
        self.state.read().await.jobs.get(&job_id).cloned()
    }

    pub async fn all(&self) -> Vec<Job> {
        sorted(self.state.read().await.jobs.values().cloned().collect())
    }

    pub async fn filter_by_bucket(&self, bucket: Bucket) -> Vec<Job> {
        let state = self.state.read().await;
        sorted(
            state
                .jobs
                .values()
                .filter(|j| Bucket::of(j) == Some(bucket))
                .cloned()
                .collect(),
        )
    }

    /// Delivered jobs, most recently updated first.
    pub async fn archive(&self) -> Vec<Job> {
        let state = self.state.read().await;
        let mut jobs: Vec<Job> = state
            .jobs
            .values()
            .filter(|j| j.status == JobStatus::Delivered)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then(a.job_number.cmp(&b.job_number))
        });
        jobs
    }

    pub async fn summary(&self) -> DashboardSummary {
        let state = self.state.read().await;
        let mut summary = DashboardSummary {
            pending: 0,
            active: 0,
            done: 0,
            delivered: 0,
            revenue: Money::ZERO,
            revenue_label: String::new(),
        };
        for job in state.jobs.values() {
            match Bucket::of(job) {
                Some(Bucket::Pending) => summary.pending += 1,
                Some(Bucket::Active) => summary.active += 1,
                Some(Bucket::Done) => summary.done += 1,
                None => {
                    summary.delivered += 1;
                    summary.revenue = summary.revenue + job.total_cost();
                }
            }
        }
        summary.revenue_label = summary.revenue.format(&self.currency_symbol);
        summary
    }

    #[instrument(skip(self, draft), fields(job_number = %draft.job_number))]
    pub async fn create(&self, draft: NewJob) -> Result<Job, BoardError> {
        // Step 1: Build and validate the entity.
        let mut job = Job::new(
            self.scope_id,
            draft.job_number,
            draft.customer_name,
            draft.vehicle_label,
            draft.services,
        )
        .map_err(BoardError::Validation)?;
        job.priority = draft.priority;
        job.vehicle_id = draft.vehicle_id;
        job.notes = draft.notes.filter(|n| !n.trim().is_empty());

        // Step 2: Persist, then add what was stored to the board.
        let stored = self.repo.insert(&job).await.map_err(|err| {
            warn!(error = ?err, "job_create_failed");
            BoardError::Persistence(err)
        })?;
        self.state
            .write()
            .await
            .jobs
            .insert(stored.id, stored.clone());
        info!(job_id = %stored.id, "job_created");
        Ok(stored)
    }

    #[instrument(skip(self), fields(job_id = %job_id))]
    pub async fn delete(&self, job_id: JobId) -> Result<(), BoardError> {
        if self.state.read().await.in_flight.contains_key(&job_id) {
            return Err(BoardError::WriteInFlight);
        }
        let result = self.repo.delete(job_id).await;
        match result {
            Ok(()) => {
                self.state.write().await.jobs.remove(&job_id);
                info!("job_deleted");
                Ok(())
            }
            Err(JobRepositoryError::NotFound) => {
                self.state.write().await.jobs.remove(&job_id);
                Err(BoardError::NotFound)
            }
            Err(err) => {
                warn!(error = ?err, "job_delete_failed");
                Err(BoardError::Persistence(err))
            }
        }
    }

    /// Run a lifecycle command: validate on a copy, stage it, write through, revert on failure.
    #[instrument(skip(self), fields(job_id = %job_id, op = command.name()))]
    pub async fn execute(
        &self,
        job_id: JobId,
        command: JobCommand,
    ) -> Result<CommandOutcome, BoardError> {
        let op = command.name();

        // Step 1: Validate against the cached job and stage the result under one lock.
        let (staged, transition) = {
            let mut state = self.state.write().await;
            if state.in_flight.contains_key(&job_id) {
                counter!("job_transitions_total", "op" => op, "outcome" => "in_flight")
                    .increment(1);
                return Err(BoardError::WriteInFlight);
            }
            let Some(current) = state.jobs.get(&job_id) else {
                return Err(BoardError::NotFound);
            };
            let mut next = current.clone();
            let transition = match self.lifecycle.apply(&mut next, &command) {
                Ok(transition) => transition,
                Err(err) => {
                    counter!("job_transitions_total", "op" => op, "outcome" => "rejected")
                        .increment(1);
                    info!(reason = %err, "job_command_rejected");
                    return Err(BoardError::Transition(err));
                }
            };
            let patch = JobPatch::between(current, &next);
            (stage(&mut state, job_id, &patch)?, transition)
        };

        // Step 2: Write through without holding the lock.
        match self.repo.update(&staged).await {
            Ok(stored) => {
                self.confirm_write(stored.clone()).await;
                counter!("job_transitions_total", "op" => op, "outcome" => "ok").increment(1);
                info!(
                    from = transition.from.phase().as_str(),
                    to = transition.to.phase().as_str(),
                    cascade = transition.cascaded,
                    "job_command_applied"
                );
                Ok(CommandOutcome {
                    job: stored,
                    transition,
                })
            }
            Err(err) => {
                // Step 3: Undo locally and resynchronise.
                counter!("job_transitions_total", "op" => op, "outcome" => "write_failed")
                    .increment(1);
                warn!(error = ?err, "job_write_failed_reverting");
                self.revert_on_failure(job_id).await;
                Err(BoardError::Persistence(err))
            }
        }
    }

    pub async fn assign(
        &self,
        job_id: JobId,
        technician: &str,
    ) -> Result<CommandOutcome, BoardError> {
        self.execute(
            job_id,
            JobCommand::Assign {
                technician: technician.to_string(),
            },
        )
        .await
    }

    pub async fn toggle_task(
        &self,
        job_id: JobId,
        task: TaskKey,
    ) -> Result<CommandOutcome, BoardError> {
        self.execute(job_id, JobCommand::ToggleTask(task)).await
    }

    pub async fn set_task_status(
        &self,
        job_id: JobId,
        task: TaskKey,
        status: TaskStatus,
    ) -> Result<CommandOutcome, BoardError> {
        self.execute(job_id, JobCommand::SetTaskStatus(task, status))
            .await
    }

    pub async fn mark_work_complete(&self, job_id: JobId) -> Result<CommandOutcome, BoardError> {
        self.execute(job_id, JobCommand::MarkWorkComplete).await
    }

    pub async fn mark_quality_check(&self, job_id: JobId) -> Result<CommandOutcome, BoardError> {
        self.execute(job_id, JobCommand::MarkQualityCheck).await
    }

    pub async fn mark_delivered(&self, job_id: JobId) -> Result<CommandOutcome, BoardError> {
        self.execute(job_id, JobCommand::MarkDelivered).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::job_lifecycle::JobLifecycle;
    use crate::infrastructure::db::dto::JobRow;
    use crate::infrastructure::db::memory::MemoryJobStore;

    fn job(scope: ScopeId, number: &str, tasks: &[&str]) -> Job {
        let services = tasks
            .iter()
            .map(|t| ServiceItem::new(*t, Money::from_major(1_000), "1 h"))
            .collect();
        Job::new(scope, number, "Bilal", "Corolla LEA-9080", services).unwrap()
    }

    async fn board_with(jobs: Vec<Job>) -> (JobBoard, Arc<MemoryJobStore>, ScopeId) {
        let scope = jobs.first().map(|j| j.scope_id).unwrap_or_default();
        let store = Arc::new(MemoryJobStore::with_rows(jobs.iter().map(JobRow::from_job)));
        let board = JobBoard::new(
            Arc::new(JobRepository::new(store.clone())),
            Arc::new(JobLifecycle),
            scope,
            "Rs",
        );
        board.load_all().await;
        (board, store, scope)
    }

    #[tokio::test]
    async fn given_jobs_in_store_when_load_all_should_return_them_sorted() {
        let scope = ScopeId::new();
        let (board, _, _) =
            board_with(vec![job(scope, "JC-2", &["Brakes"]), job(scope, "JC-1", &["Oil"])]).await;

        let jobs = board.load_all().await;

        let numbers: Vec<_> = jobs.iter().map(|j| j.job_number.as_str()).collect();
        assert_eq!(numbers, vec!["JC-1", "JC-2"]);
    }

    #[tokio::test]
    async fn given_read_failure_when_load_all_should_keep_stale_set() {
        let scope = ScopeId::new();
        let (board, store, _) = board_with(vec![job(scope, "JC-1", &["Oil"])]).await;
        store.fail_reads(true);

        let jobs = board.load_all().await;

        assert_eq!(jobs.len(), 1);
        assert!(board.try_load_all().await.is_err());
    }

    #[tokio::test]
    async fn given_pending_job_when_assign_should_persist_active_status() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &["Oil"]);
        let id = pending.id;
        let (board, store, _) = board_with(vec![pending]).await;

        let outcome = board.assign(id, "Ahmed Raza").await.unwrap();

        assert_eq!(outcome.job.status, JobStatus::ACTIVE);
        let row = store.snapshot(id.0).await.unwrap();
        assert_eq!(row.status, "in_progress");
        assert_eq!(row.assigned_technician.as_deref(), Some("Ahmed Raza"));
    }

    #[tokio::test]
    async fn given_failed_write_when_execute_should_restore_snapshot() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &["Oil"]);
        let id = pending.id;
        let (board, store, _) = board_with(vec![pending]).await;
        let before = board.get(id).await.unwrap();
        store.fail_writes(true);

        let result = board.assign(id, "Ahmed Raza").await;

        assert_eq!(
            result.unwrap_err(),
            BoardError::Persistence(JobRepositoryError::StorageUnavailable)
        );
        assert_eq!(board.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn given_failed_write_and_failed_reload_when_execute_should_still_restore_snapshot() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &["Oil"]);
        let id = pending.id;
        let (board, store, _) = board_with(vec![pending]).await;
        let before = board.get(id).await.unwrap();
        store.fail_writes(true);
        store.fail_reads(true);

        let _ = board.assign(id, "Ahmed Raza").await;

        assert_eq!(board.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn given_write_in_flight_when_execute_should_fail_fast() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &["Oil"]);
        let id = pending.id;
        let (board, _, _) = board_with(vec![pending]).await;
        let patch = JobPatch {
            notes: Some(Some("customer waiting".to_string())),
            ..JobPatch::default()
        };
        board.apply_optimistic(id, &patch).await.unwrap();

        let result = board.assign(id, "Ahmed Raza").await;

        assert_eq!(result.unwrap_err(), BoardError::WriteInFlight);
        assert_eq!(
            board.get(id).await.unwrap().notes.as_deref(),
            Some("customer waiting")
        );
    }

    #[tokio::test]
    async fn given_write_in_flight_when_reload_should_keep_staged_copy() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &["Oil"]);
        let id = pending.id;
        let (board, _, _) = board_with(vec![pending]).await;
        let patch = JobPatch {
            notes: Some(Some("staged".to_string())),
            ..JobPatch::default()
        };
        board.apply_optimistic(id, &patch).await.unwrap();

        board.load_all().await;

        assert_eq!(board.get(id).await.unwrap().notes.as_deref(), Some("staged"));
    }

    #[tokio::test]
    async fn given_rejected_command_when_execute_should_not_mutate_or_write() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &["Oil"]);
        let id = pending.id;
        let (board, store, _) = board_with(vec![pending]).await;
        let before = store.snapshot(id.0).await.unwrap();

        let result = board.mark_work_complete(id).await;

        assert!(matches!(result, Err(BoardError::Transition(_))));
        assert_eq!(board.get(id).await.unwrap().status, JobStatus::Pending);
        assert_eq!(store.snapshot(id.0).await.unwrap().updated_at, before.updated_at);
    }

    #[tokio::test]
    async fn given_unknown_job_when_execute_should_return_not_found() {
        let (board, _, _) = board_with(vec![]).await;

        assert_eq!(
            board.mark_delivered(JobId::new()).await.unwrap_err(),
            BoardError::NotFound
        );
    }

    #[tokio::test]
    async fn given_jobs_in_every_state_when_filter_by_bucket_should_partition() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &[]);
        let mut active = job(scope, "JC-2", &[]);
        active.status = JobStatus::ACTIVE;
        let mut done = job(scope, "JC-3", &[]);
        done.status = JobStatus::Done;
        let mut delivered = job(scope, "JC-4", &["Tyres"]);
        delivered.status = JobStatus::Delivered;
        let (board, _, _) = board_with(vec![pending, active, done, delivered]).await;

        assert_eq!(board.filter_by_bucket(Bucket::Pending).await[0].job_number, "JC-1");
        assert_eq!(board.filter_by_bucket(Bucket::Active).await[0].job_number, "JC-2");
        assert_eq!(board.filter_by_bucket(Bucket::Done).await[0].job_number, "JC-3");
        assert_eq!(board.archive().await[0].job_number, "JC-4");

        let summary = board.summary().await;
        assert_eq!(
            (summary.pending, summary.active, summary.done, summary.delivered),
            (1, 1, 1, 1)
        );
        assert_eq!(summary.revenue, Money::from_major(1_000));
        assert_eq!(summary.revenue_label, "Rs 1,000.00");
    }

    #[tokio::test]
    async fn given_new_job_when_create_should_store_and_show_on_board() {
        let (board, store, _) = board_with(vec![]).await;

        let created = board
            .create(NewJob {
                job_number: "JC-77".to_string(),
                customer_name: "Sana".to_string(),
                vehicle_label: "Alto KHI-101".to_string(),
                services: vec![ServiceItem::new("Wash", Money::from_major(300), "15 min")],
                priority: JobPriority::Urgent,
                vehicle_id: None,
                notes: Some("  ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.notes, None);
        assert!(store.snapshot(created.id.0).await.is_some());
        assert_eq!(board.filter_by_bucket(Bucket::Pending).await.len(), 1);
    }

    #[tokio::test]
    async fn given_blank_job_number_when_create_should_fail_validation() {
        let (board, _, _) = board_with(vec![]).await;

        let result = board
            .create(NewJob {
                job_number: " ".to_string(),
                customer_name: "Sana".to_string(),
                vehicle_label: String::new(),
                services: vec![],
                priority: JobPriority::Normal,
                vehicle_id: None,
                notes: None,
            })
            .await;

        assert_eq!(
            result.unwrap_err(),
            BoardError::Validation(JobValidationError::EmptyJobNumber)
        );
    }

    #[tokio::test]
    async fn given_existing_job_when_delete_should_remove_remotely_and_locally() {
        let scope = ScopeId::new();
        let pending = job(scope, "JC-1", &["Oil"]);
        let id = pending.id;
        let (board, store, _) = board_with(vec![pending]).await;

        board.delete(id).await.unwrap();

        assert!(board.get(id).await.is_none());
        assert!(store.snapshot(id.0).await.is_none());
        assert_eq!(board.delete(id).await.unwrap_err(), BoardError::NotFound);
    }
}
