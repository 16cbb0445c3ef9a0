pub mod dto;
pub mod problem;
pub mod routes;
pub mod state;
pub mod trace;

use axum::Router;
use axum::middleware;

use crate::interface::http::state::AppState;

/// Full HTTP surface with trace-id propagation and request logging.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::ready::router())
        .merge(routes::job::router())
        .merge(routes::dashboard::router())
        .merge(routes::vehicle::router())
        .layer(middleware::from_fn(trace::request_log_middleware))
        .layer(middleware::from_fn(trace::trace_id_middleware))
        .with_state(state)
}
