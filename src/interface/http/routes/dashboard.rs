use crate::interface::http::dto::job::DashboardResponse;
use crate::interface::http::state::AppState;
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;

/// Builds the dashboard summary route.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// Per-bucket counts and delivered revenue.
async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(state.ctx.board.summary().await.into())
}
