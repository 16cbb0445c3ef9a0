use std::sync::Arc;

use crate::infrastructure::db::database::{Database, DatabaseError};
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::postgres::job_store_postgres::JobStorePostgres;
use crate::infrastructure::db::postgres::vehicle_store_postgres::VehicleStorePostgres;
use crate::infrastructure::db::repositories::job_repository::JobRepository;
use crate::infrastructure::db::repositories::vehicle_repository::VehicleRepository;
use crate::infrastructure::db::stores::job_store::JobStore;
use crate::infrastructure::db::stores::vehicle_store::VehicleStore;

#[derive(Clone)]
pub struct Repositories {
    pub db: Option<Arc<PostgresDatabase>>,
    pub job: Arc<JobRepository>,
    pub vehicle: Arc<VehicleRepository>,
}

impl Repositories {
    /// Build all repositories backed by Postgres stores.
    pub fn postgres(db: Arc<PostgresDatabase>) -> Self {
        let job_store = Arc::new(JobStorePostgres::new(db.clone()));
        let vehicle_store = Arc::new(VehicleStorePostgres::new(db.clone()));

        Self {
            db: Some(db),
            job: Arc::new(JobRepository::new(job_store)),
            vehicle: Arc::new(VehicleRepository::new(vehicle_store)),
        }
    }

    /// Build repositories over arbitrary stores (in-memory ones for tests and offline runs).
    pub fn with_stores(job_store: Arc<dyn JobStore>, vehicle_store: Arc<dyn VehicleStore>) -> Self {
        Self {
            db: None,
            job: Arc::new(JobRepository::new(job_store)),
            vehicle: Arc::new(VehicleRepository::new(vehicle_store)),
        }
    }

    /// Execute a raw SQL statement. Without a database there is nothing to probe.
    pub async fn execute(&self, query: &str) -> Result<u64, DatabaseError> {
        match self.db.as_ref() {
            Some(db) => db.execute(query).await,
            None => Ok(0),
        }
    }
}
