use std::sync::Arc;

use crate::application::services::job_board::JobBoard;
use crate::application::services::vehicle_service::VehicleService;
use crate::domain::services::job_lifecycle::JobLifecycleService;
use crate::domain::value_objects::ids::ScopeId;
use crate::infrastructure::db::repositories::Repositories;
use crate::infrastructure::local::LocalStore;

/// Per-deployment values the services need.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub scope_id: ScopeId,
    pub currency_symbol: String,
    pub vehicle_cache_key: String,
}

/// Shared application resources used by routes and background tasks.
pub struct AppContext {
    pub repos: Repositories,
    pub board: Arc<JobBoard>,
    pub vehicles: Arc<VehicleService>,
}

impl AppContext {
    /// Build a new application context with shared repositories and services.
    pub fn new(
        repos: Repositories,
        job_lifecycle: Arc<dyn JobLifecycleService>,
        local: LocalStore,
        options: ContextOptions,
    ) -> Self {
        let board = Arc::new(JobBoard::new(
            repos.job.clone(),
            job_lifecycle,
            options.scope_id,
            options.currency_symbol,
        ));
        let vehicles = Arc::new(VehicleService::new(
            repos.vehicle.clone(),
            local,
            options.scope_id,
            options.vehicle_cache_key,
        ));
        Self {
            repos,
            board,
            vehicles,
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::{AppContext, ContextOptions};
    use crate::domain::services::job_lifecycle::JobLifecycle;
    use crate::domain::value_objects::ids::ScopeId;
    use crate::infrastructure::db::memory::{MemoryJobStore, MemoryVehicleStore};
    use crate::infrastructure::db::repositories::Repositories;
    use crate::infrastructure::local::{LocalStore, MemoryKeyValueStore, VEHICLE_CACHE_KEY};
    use std::sync::Arc;

    /// Context over the given in-memory stores.
    pub fn test_context_with(
        scope_id: ScopeId,
        jobs: Arc<MemoryJobStore>,
        vehicles: Arc<MemoryVehicleStore>,
    ) -> AppContext {
        // Step 1: Build repositories backed by memory stores.
        let repos = Repositories::with_stores(jobs, vehicles);
        // Step 2: Wire the default rule set and an in-memory local store.
        AppContext::new(
            repos,
            Arc::new(JobLifecycle),
            LocalStore::new(Arc::new(MemoryKeyValueStore::new())),
            ContextOptions {
                scope_id,
                currency_symbol: "Rs".to_string(),
                vehicle_cache_key: VEHICLE_CACHE_KEY.to_string(),
            },
        )
    }

    pub fn test_context() -> AppContext {
        test_context_with(
            ScopeId::new(),
            Arc::new(MemoryJobStore::new()),
            Arc::new(MemoryVehicleStore::new()),
        )
    }
}
