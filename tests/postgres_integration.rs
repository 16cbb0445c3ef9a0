use garage_desk::domain::entities::job::{Job, ServiceItem};
use garage_desk::domain::entities::task::TaskStatus;
use garage_desk::domain::entities::vehicle::{
    Vehicle, VehicleStatus, VehicleTask, VehicleTaskStatus,
};
use garage_desk::domain::value_objects::ids::{ScopeId, TaskId, VehicleId};
use garage_desk::domain::value_objects::money::Money;
use garage_desk::domain::value_objects::timestamps::Timestamp;
use garage_desk::infrastructure::db::postgres::PostgresDatabase;
use garage_desk::infrastructure::db::postgres::change_feed_postgres::ChangeFeedPostgres;
use garage_desk::infrastructure::db::repositories::Repositories;
use garage_desk::infrastructure::db::stores::change_feed::ChangeFeed;
use garage_desk::infrastructure::db::stores::job_store::JobRepositoryError;
use std::sync::Arc;
use std::time::Duration;

async fn connect() -> Option<Arc<PostgresDatabase>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = PostgresDatabase::connect(&url, 2).await.unwrap();
    sqlx::raw_sql(include_str!("../migrations/0001_init.sql"))
        .execute(db.pool())
        .await
        .unwrap();
    Some(Arc::new(db))
}

fn job(scope: ScopeId, number: &str) -> Job {
    Job::new(
        scope,
        number,
        "Kamran",
        "Suzuki Cultus LEC-3321",
        vec![ServiceItem::new("Oil change", Money::from_major(2_500), "30 min")],
    )
    .unwrap()
}

#[tokio::test]
async fn given_postgres_when_job_round_trips_should_keep_status_and_checklist() {
    let Some(db) = connect().await else {
        return;
    };
    let repos = Repositories::postgres(db);
    let scope = ScopeId::new();

    // Insert and read back.
    let stored = repos.job.insert(&job(scope, "PG-1")).await.unwrap();
    let loaded = repos.job.get(stored.id).await.unwrap().unwrap();
    assert_eq!(loaded.job_number, "PG-1");
    assert_eq!(loaded.services.len(), 1);

    // Update the technician and task status.
    let mut changed = loaded.clone();
    changed.assigned_technician = Some("Ahmed".to_string());
    let key = changed.task_keys().next().unwrap();
    changed.tasks.set(key, TaskStatus::Complete);
    let updated = repos.job.update(&changed).await.unwrap();
    assert_eq!(updated.assigned_technician.as_deref(), Some("Ahmed"));
    assert_eq!(updated.tasks, changed.tasks);

    // Scope listing, then delete.
    let listed = repos.job.list_by_scope(scope).await.unwrap();
    assert_eq!(listed.len(), 1);
    repos.job.delete(stored.id).await.unwrap();
    assert_eq!(
        repos.job.delete(stored.id).await,
        Err(JobRepositoryError::NotFound)
    );
}

#[tokio::test]
async fn given_postgres_when_job_number_reused_in_scope_should_conflict() {
    let Some(db) = connect().await else {
        return;
    };
    let repos = Repositories::postgres(db);
    let scope = ScopeId::new();

    let first = repos.job.insert(&job(scope, "PG-DUP")).await.unwrap();
    let second = repos.job.insert(&job(scope, "PG-DUP")).await;

    assert_eq!(second, Err(JobRepositoryError::Conflict));
    repos.job.delete(first.id).await.unwrap();
}

#[tokio::test]
async fn given_postgres_when_vehicle_inserted_should_publish_change_notice() {
    let Some(db) = connect().await else {
        return;
    };
    let mut feed = ChangeFeedPostgres::connect(&db).await.unwrap();
    let repos = Repositories::postgres(db);
    let vehicle = Vehicle {
        id: VehicleId::new(),
        scope_id: ScopeId::new(),
        plate: "PG-100".to_string(),
        make: "Honda".to_string(),
        model: "Civic".to_string(),
        owner_name: "Sana".to_string(),
        assigned_technician: Some("Bilal".to_string()),
        status: VehicleStatus::InShop,
        tasks: vec![VehicleTask {
            id: TaskId::new(),
            name: "Alignment".to_string(),
            cost: Money::from_major(1_200),
            status: VehicleTaskStatus::Pending,
        }],
        updated_at: Timestamp::now_utc(),
    };

    let stored = repos.vehicle.insert(&vehicle).await.unwrap();
    assert_eq!(stored.tasks, vehicle.tasks);

    // Other tests may publish job notices on the same channel.
    let seen = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(notice) = feed.next().await {
            if notice.table == "vehicles" {
                return true;
            }
        }
        false
    })
    .await
    .unwrap();
    assert!(seen);

    repos.vehicle.delete(stored.id).await.unwrap();
}
