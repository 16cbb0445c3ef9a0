use axum::body::Body;
use axum::http::{Request, StatusCode};
use garage_desk::application::context::{AppContext, ContextOptions};
use garage_desk::domain::services::job_lifecycle::JobLifecycle;
use garage_desk::domain::value_objects::ids::ScopeId;
use garage_desk::infrastructure::db::memory::{MemoryJobStore, MemoryVehicleStore};
use garage_desk::infrastructure::db::repositories::Repositories;
use garage_desk::infrastructure::local::{LocalStore, MemoryKeyValueStore, VEHICLE_CACHE_KEY};
use garage_desk::interface::http;
use garage_desk::interface::http::state::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

fn memory_state() -> AppState {
    let repos = Repositories::with_stores(
        Arc::new(MemoryJobStore::new()),
        Arc::new(MemoryVehicleStore::new()),
    );
    let ctx = AppContext::new(
        repos,
        Arc::new(JobLifecycle),
        LocalStore::new(Arc::new(MemoryKeyValueStore::new())),
        ContextOptions {
            scope_id: ScopeId::new(),
            currency_symbol: "Rs".to_string(),
            vehicle_cache_key: VEHICLE_CACHE_KEY.to_string(),
        },
    );
    AppState { ctx: Arc::new(ctx) }
}

#[tokio::test]
async fn given_app_when_health_requested_should_return_ok_with_request_id() {
    let response = http::app(memory_state())
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn given_memory_stores_when_ready_requested_should_return_ok() {
    let response = http::app(memory_state())
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
