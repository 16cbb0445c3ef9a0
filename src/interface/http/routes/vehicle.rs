// HTTP routes: technician vehicle view and vehicle/task status updates.

use crate::application::services::vehicle_service::VehicleServiceError;
use crate::domain::entities::vehicle::{VehicleStatus, VehicleTaskStatus};
use crate::domain::value_objects::ids::{TaskId, VehicleId};
use crate::infrastructure::db::stores::vehicle_store::VehicleRepositoryError;
use crate::interface::http::dto::vehicle::{
    VehicleListQuery, VehicleListResponse, VehicleResponse, VehicleStatusRequest,
    VehicleTaskStatusRequest,
};
use crate::interface::http::problem::{
    GD_REQUEST_MALFORMED, GD_STORAGE_DB_ERROR, GD_VEHICLE_NOT_FOUND,
    GD_VEHICLE_TRANSITION_REJECTED, problem,
};
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use std::str::FromStr;

/// Builds vehicle routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/vehicles", get(list_vehicles))
        .route("/vehicles/:vehicle_id/status", put(update_status))
        .route("/vehicles/:vehicle_id/tasks/:task_id", put(update_task_status))
}

fn malformed(detail: &str, trace_id: Option<String>) -> Response {
    problem(
        StatusCode::BAD_REQUEST,
        GD_REQUEST_MALFORMED,
        Some(detail.to_string()),
        None,
        trace_id,
    )
}

fn vehicle_problem(err: VehicleServiceError, trace_id: Option<String>) -> Response {
    match err {
        VehicleServiceError::NotFound => problem(
            StatusCode::NOT_FOUND,
            GD_VEHICLE_NOT_FOUND,
            Some("vehicle not found".to_string()),
            None,
            trace_id,
        ),
        VehicleServiceError::UnknownTask(task_id) => problem(
            StatusCode::NOT_FOUND,
            GD_VEHICLE_NOT_FOUND,
            Some(format!("task {task_id} not found on vehicle")),
            None,
            trace_id,
        ),
        VehicleServiceError::Transition(e) => problem(
            StatusCode::CONFLICT,
            GD_VEHICLE_TRANSITION_REJECTED,
            Some(e.to_string()),
            None,
            trace_id,
        ),
        VehicleServiceError::Persistence(VehicleRepositoryError::NotFound) => problem(
            StatusCode::NOT_FOUND,
            GD_VEHICLE_NOT_FOUND,
            Some("vehicle not found".to_string()),
            None,
            trace_id,
        ),
        VehicleServiceError::Persistence(_) => problem(
            StatusCode::SERVICE_UNAVAILABLE,
            GD_STORAGE_DB_ERROR,
            Some("storage unavailable".to_string()),
            None,
            trace_id,
        ),
    }
}

/// Vehicles assigned to a technician; served from the offline mirror when the store is down.
async fn list_vehicles(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Query(query): Query<VehicleListQuery>,
) -> Response {
    let technician = query.technician.trim();
    if technician.is_empty() {
        return malformed("technician is required", Some(trace_id.0));
    }
    let list = state.ctx.vehicles.load_vehicles(technician).await;
    (StatusCode::OK, Json(VehicleListResponse::from(&list))).into_response()
}

async fn update_status(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(vehicle_id): Path<String>,
    Json(payload): Json<VehicleStatusRequest>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    // Step 1: Parse path and body.
    let Ok(vehicle_id) = VehicleId::from_str(&vehicle_id) else {
        return malformed("invalid vehicle_id", trace_id);
    };
    let Some(status) = VehicleStatus::parse(&payload.status) else {
        return malformed("unknown vehicle status", trace_id);
    };

    // Step 2: Apply and map the result.
    match state.ctx.vehicles.update_status(vehicle_id, status).await {
        Ok(vehicle) => (StatusCode::OK, Json(VehicleResponse::from(&vehicle))).into_response(),
        Err(err) => vehicle_problem(err, trace_id),
    }
}

async fn update_task_status(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path((vehicle_id, task_id)): Path<(String, String)>,
    Json(payload): Json<VehicleTaskStatusRequest>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let Ok(vehicle_id) = VehicleId::from_str(&vehicle_id) else {
        return malformed("invalid vehicle_id", trace_id);
    };
    let Ok(task_id) = TaskId::from_str(&task_id) else {
        return malformed("invalid task_id", trace_id);
    };
    let Some(status) = VehicleTaskStatus::parse(&payload.status) else {
        return malformed("unknown task status", trace_id);
    };

    match state
        .ctx
        .vehicles
        .update_task_status(vehicle_id, task_id, status)
        .await
    {
        Ok(vehicle) => (StatusCode::OK, Json(VehicleResponse::from(&vehicle))).into_response(),
        Err(err) => vehicle_problem(err, trace_id),
    }
}
