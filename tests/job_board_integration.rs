use garage_desk::application::services::change_watcher::ChangeWatcher;
use garage_desk::application::services::job_board::{BoardError, JobBoard, JobPatch};
use garage_desk::application::services::vehicle_service::VehicleService;
use garage_desk::domain::entities::job::{Job, JobStatus, ServiceItem};
use garage_desk::domain::entities::task::TaskStatus;
use garage_desk::domain::services::job_lifecycle::JobLifecycle;
use garage_desk::domain::value_objects::ids::ScopeId;
use garage_desk::domain::value_objects::money::Money;
use garage_desk::domain::workflows::bucket::Bucket;
use garage_desk::domain::workflows::checklist::ChecklistTracker;
use garage_desk::domain::workflows::state_machine::TransitionError;
use garage_desk::infrastructure::db::dto::JobRow;
use garage_desk::infrastructure::db::memory::{MemoryChangeFeed, MemoryJobStore, MemoryVehicleStore};
use garage_desk::infrastructure::db::repositories::job_repository::JobRepository;
use garage_desk::infrastructure::db::repositories::vehicle_repository::VehicleRepository;
use garage_desk::infrastructure::db::stores::job_store::{JobRepositoryError, JobStore};
use garage_desk::infrastructure::local::{LocalStore, MemoryKeyValueStore, VEHICLE_CACHE_KEY};
use std::sync::Arc;

fn j1(scope: ScopeId) -> Job {
    Job::new(
        scope,
        "J1",
        "Kamran",
        "Suzuki Cultus LEC-3321",
        vec![
            ServiceItem::new("Oil change", Money::from_major(2_500), "30 min"),
            ServiceItem::new("Brake pads", Money::from_major(6_000), "1 h"),
        ],
    )
    .unwrap()
}

async fn board_over(jobs: &[Job]) -> (Arc<JobBoard>, Arc<MemoryJobStore>) {
    let scope = jobs[0].scope_id;
    let store = Arc::new(MemoryJobStore::with_rows(jobs.iter().map(JobRow::from_job)));
    let board = Arc::new(JobBoard::new(
        Arc::new(JobRepository::new(store.clone())),
        Arc::new(JobLifecycle),
        scope,
        "Rs",
    ));
    board.load_all().await;
    (board, store)
}

#[tokio::test]
async fn given_scenario_j1_when_driven_through_board_should_end_in_archive() {
    let scope = ScopeId::new();
    let job = j1(scope);
    let id = job.id;
    let (board, store) = board_over(&[job]).await;

    // Assign: pending -> active.
    board.assign(id, "Ahmed Raza").await.unwrap();
    let current = board.get(id).await.unwrap();
    assert_eq!(current.status.phase().display_name(), "Progress");
    assert_eq!(Bucket::of(&current), Some(Bucket::Active));

    // Resolve both tasks.
    let keys: Vec<_> = current.task_keys().collect();
    for key in keys {
        board.toggle_task(id, key).await.unwrap();
    }
    assert!(ChecklistTracker::all_resolved(&board.get(id).await.unwrap()));

    // Work complete alone does not finish the job.
    let outcome = board.mark_work_complete(id).await.unwrap();
    assert!(outcome.job.work_completed());
    assert!(!outcome.transition.cascaded);
    assert_eq!(
        outcome.job.status,
        JobStatus::Active {
            work_completed: true,
            quality_check_completed: false
        }
    );

    // Quality check cascades to Done.
    let outcome = board.mark_quality_check(id).await.unwrap();
    assert!(outcome.transition.cascaded);
    assert_eq!(outcome.job.status, JobStatus::Done);
    assert_eq!(board.filter_by_bucket(Bucket::Done).await.len(), 1);

    // Delivery moves it out of every bucket and into the archive.
    let outcome = board.mark_delivered(id).await.unwrap();
    assert!(outcome.job.delivery_completed());
    assert!(board.filter_by_bucket(Bucket::Done).await.is_empty());
    assert_eq!(board.archive().await.len(), 1);
    assert_eq!(store.snapshot(id.0).await.unwrap().status, "delivered");

    let summary = board.summary().await;
    assert_eq!(summary.delivered, 1);
    assert_eq!(summary.revenue_label, "Rs 8,500.00");
}

#[tokio::test]
async fn given_pending_approval_when_mark_work_complete_should_be_rejected_without_write() {
    let scope = ScopeId::new();
    let job = j1(scope);
    let id = job.id;
    let keys: Vec<_> = job.task_keys().collect();
    let (board, store) = board_over(&[job]).await;
    board.assign(id, "Ahmed Raza").await.unwrap();
    board
        .set_task_status(id, keys[0].clone(), TaskStatus::Complete)
        .await
        .unwrap();
    board
        .set_task_status(id, keys[1].clone(), TaskStatus::NeedsApproval)
        .await
        .unwrap();
    let stored_before = store.snapshot(id.0).await.unwrap();

    let result = board.mark_work_complete(id).await;

    assert_eq!(
        result.unwrap_err(),
        BoardError::Transition(TransitionError::PendingApprovals { count: 1 })
    );
    assert_eq!(store.snapshot(id.0).await.unwrap().updated_at, stored_before.updated_at);
    assert!(!board.get(id).await.unwrap().work_completed());
}

#[tokio::test]
async fn given_write_failure_when_command_runs_should_restore_pre_command_snapshot() {
    let scope = ScopeId::new();
    let job = j1(scope);
    let id = job.id;
    let (board, store) = board_over(&[job]).await;
    board.assign(id, "Ahmed Raza").await.unwrap();
    let snapshot = board.get(id).await.unwrap();
    store.fail_writes(true);

    let key = snapshot.task_keys().next().unwrap();
    let result = board.toggle_task(id, key).await;

    assert_eq!(
        result.unwrap_err(),
        BoardError::Persistence(JobRepositoryError::StorageUnavailable)
    );
    assert_eq!(board.get(id).await.unwrap(), snapshot);

    // The marker is cleared, so the next command goes through once the store recovers.
    store.fail_writes(false);
    assert!(board.mark_quality_check(id).await.is_ok());
}

#[tokio::test]
async fn given_staged_write_when_second_command_arrives_should_reject_until_resolved() {
    let scope = ScopeId::new();
    let job = j1(scope);
    let id = job.id;
    let (board, _) = board_over(&[job]).await;
    let patch = JobPatch {
        notes: Some(Some("call before delivery".to_string())),
        ..JobPatch::default()
    };
    let staged = board.apply_optimistic(id, &patch).await.unwrap();

    assert_eq!(
        board.assign(id, "Ahmed Raza").await.unwrap_err(),
        BoardError::WriteInFlight
    );
    assert_eq!(board.delete(id).await.unwrap_err(), BoardError::WriteInFlight);

    board.confirm_write(staged).await;
    assert!(board.assign(id, "Ahmed Raza").await.is_ok());
}

#[tokio::test]
async fn given_change_notice_when_watcher_running_should_reload_remote_edits() {
    let scope = ScopeId::new();
    let job = j1(scope);
    let id = job.id;
    let (board, store) = board_over(&[job.clone()]).await;
    let vehicles = Arc::new(VehicleService::new(
        Arc::new(VehicleRepository::new(Arc::new(MemoryVehicleStore::new()))),
        LocalStore::new(Arc::new(MemoryKeyValueStore::new())),
        scope,
        VEHICLE_CACHE_KEY,
    ));
    let (notifier, feed) = MemoryChangeFeed::channel(8);
    let watcher = ChangeWatcher::spawn(feed, board.clone(), vehicles);

    // Another client renames the customer remotely.
    let mut remote = job;
    remote.customer_name = "Kamran Ali".to_string();
    store.update(&JobRow::from_job(&remote)).await.unwrap();
    notifier.publish("jobs");
    drop(notifier);
    watcher.await.unwrap();

    assert_eq!(board.get(id).await.unwrap().customer_name, "Kamran Ali");
}
