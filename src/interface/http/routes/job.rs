// HTTP routes: job board, lifecycle commands, archive and refresh.

use crate::application::services::job_board::{BoardError, CommandOutcome, NewJob};
use crate::domain::entities::job::{JobPriority, ServiceItem};
use crate::domain::entities::task::{TaskKey, TaskStatus};
use crate::domain::value_objects::ids::{JobId, VehicleId};
use crate::domain::value_objects::money::Money;
use crate::domain::workflows::bucket::Bucket;
use crate::domain::workflows::state_machine::TransitionError;
use crate::infrastructure::db::stores::job_store::JobRepositoryError;
use crate::interface::http::dto::job::{
    AssignRequest, CreateJobRequest, JobListQuery, JobListResponse, JobResponse, RefreshResponse,
    TaskStatusRequest, TransitionResponse,
};
use crate::interface::http::problem::{
    GD_JOB_CONFLICT, GD_JOB_NOT_FOUND, GD_JOB_TRANSITION_REJECTED, GD_JOB_VALIDATION_FAILED,
    GD_JOB_WRITE_IN_FLIGHT, GD_REQUEST_MALFORMED, GD_STORAGE_DB_ERROR, problem,
};
use crate::interface::http::state::AppState;
use crate::interface::http::trace::TraceId;
use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use std::str::FromStr;

/// Builds job board routes.
pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/:job_id", get(get_job).delete(delete_job))
        .route("/jobs/:job_id/assign", post(assign))
        .route("/jobs/:job_id/tasks/:task_key/toggle", post(toggle_task))
        .route("/jobs/:job_id/tasks/:task_key", put(set_task_status))
        .route("/jobs/:job_id/work-complete", post(work_complete))
        .route("/jobs/:job_id/quality-check", post(quality_check))
        .route("/jobs/:job_id/deliver", post(deliver))
        .route("/archive", get(archive))
        .route("/refresh", post(refresh))
}

fn parse_job_id(raw: &str, trace_id: Option<String>) -> Result<JobId, Response> {
    JobId::from_str(raw).map_err(|_| {
        problem(
            StatusCode::BAD_REQUEST,
            GD_REQUEST_MALFORMED,
            Some("invalid job_id".to_string()),
            None,
            trace_id,
        )
    })
}

/// Maps board failures onto problem responses.
pub(crate) fn board_problem(
    err: BoardError,
    instance: Option<String>,
    trace_id: Option<String>,
) -> Response {
    let (status, code, detail) = match err {
        BoardError::NotFound => (
            StatusCode::NOT_FOUND,
            GD_JOB_NOT_FOUND,
            "job not found".to_string(),
        ),
        BoardError::WriteInFlight => (
            StatusCode::CONFLICT,
            GD_JOB_WRITE_IN_FLIGHT,
            "a previous change to this job is still being saved".to_string(),
        ),
        BoardError::Transition(
            e @ (TransitionError::EmptyTechnician | TransitionError::UnknownTask(_)),
        ) => (StatusCode::BAD_REQUEST, GD_JOB_VALIDATION_FAILED, e.to_string()),
        BoardError::Transition(e) => (
            StatusCode::CONFLICT,
            GD_JOB_TRANSITION_REJECTED,
            e.to_string(),
        ),
        BoardError::Validation(e) => (
            StatusCode::BAD_REQUEST,
            GD_JOB_VALIDATION_FAILED,
            e.to_string(),
        ),
        BoardError::Persistence(JobRepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, GD_JOB_NOT_FOUND, "job not found".to_string())
        }
        BoardError::Persistence(JobRepositoryError::Conflict) => (
            StatusCode::CONFLICT,
            GD_JOB_CONFLICT,
            "job already exists".to_string(),
        ),
        BoardError::Persistence(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            GD_STORAGE_DB_ERROR,
            "storage unavailable".to_string(),
        ),
    };
    problem(status, code, Some(detail), instance, trace_id)
}

fn outcome_response(
    state: &AppState,
    result: Result<CommandOutcome, BoardError>,
    trace_id: Option<String>,
) -> Response {
    match result {
        Ok(outcome) => {
            let body =
                TransitionResponse::from_outcome(&outcome, state.ctx.board.currency_symbol());
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => board_problem(err, None, trace_id),
    }
}

/// Lists jobs, optionally restricted to one bucket.
async fn list_jobs(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Query(query): Query<JobListQuery>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    // Step 1: Resolve the bucket filter.
    let jobs = match query.bucket.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        Some(raw) => match Bucket::parse(raw) {
            Some(bucket) => state.ctx.board.filter_by_bucket(bucket).await,
            None => {
                return problem(
                    StatusCode::BAD_REQUEST,
                    GD_REQUEST_MALFORMED,
                    Some("bucket must be pending, active or done".to_string()),
                    None,
                    trace_id,
                );
            }
        },
        None => state.ctx.board.all().await,
    };

    // Step 2: Map to the response shape.
    let symbol = state.ctx.board.currency_symbol();
    let body = JobListResponse {
        jobs: jobs.iter().map(|j| JobResponse::from_job(j, symbol)).collect(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Delivered jobs, newest first.
async fn archive(State(state): State<AppState>) -> Response {
    let symbol = state.ctx.board.currency_symbol();
    let body = JobListResponse {
        jobs: state
            .ctx
            .board
            .archive()
            .await
            .iter()
            .map(|j| JobResponse::from_job(j, symbol))
            .collect(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Forces a full reload from the remote store.
async fn refresh(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
) -> Response {
    match state.ctx.board.try_load_all().await {
        Ok(jobs) => {
            (StatusCode::OK, Json(RefreshResponse { count: jobs.len() })).into_response()
        }
        Err(err) => board_problem(BoardError::Persistence(err), None, Some(trace_id.0)),
    }
}

async fn get_job(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(job_id): Path<String>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.ctx.board.get(job_id).await {
        Some(job) => {
            let body = JobResponse::from_job(&job, state.ctx.board.currency_symbol());
            (StatusCode::OK, Json(body)).into_response()
        }
        None => board_problem(BoardError::NotFound, Some(format!("/jobs/{job_id}")), trace_id),
    }
}

/// Creates a pending job and returns it.
async fn create_job(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Json(payload): Json<CreateJobRequest>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    // Step 1: Parse the optional vehicle link.
    let vehicle_id = match payload.vehicle_id.as_deref().filter(|v| !v.trim().is_empty()) {
        Some(raw) => match VehicleId::from_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                return problem(
                    StatusCode::BAD_REQUEST,
                    GD_REQUEST_MALFORMED,
                    Some("invalid vehicle_id".to_string()),
                    None,
                    trace_id,
                );
            }
        },
        None => None,
    };

    // Step 2: Build the draft.
    let draft = NewJob {
        job_number: payload.job_number.trim().to_string(),
        customer_name: payload.customer_name.trim().to_string(),
        vehicle_label: payload.vehicle_label.unwrap_or_default(),
        services: payload
            .services
            .into_iter()
            .map(|s| {
                ServiceItem::new(
                    s.name.trim(),
                    Money::from_minor_signed(s.cost),
                    s.estimate.unwrap_or_default(),
                )
            })
            .collect(),
        priority: payload
            .priority
            .as_deref()
            .map(JobPriority::parse)
            .unwrap_or_default(),
        vehicle_id,
        notes: payload.notes,
    };

    // Step 3: Create and map the result.
    match state.ctx.board.create(draft).await {
        Ok(job) => {
            let body = JobResponse::from_job(&job, state.ctx.board.currency_symbol());
            (StatusCode::CREATED, Json(body)).into_response()
        }
        Err(err) => board_problem(err, None, trace_id),
    }
}

async fn delete_job(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(job_id): Path<String>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.ctx.board.delete(job_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => board_problem(err, Some(format!("/jobs/{job_id}")), trace_id),
    }
}

/// Assigns a technician to a pending job and activates it.
async fn assign(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(job_id): Path<String>,
    Json(payload): Json<AssignRequest>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let result = state.ctx.board.assign(job_id, &payload.technician).await;
    outcome_response(&state, result, trace_id)
}

async fn toggle_task(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path((job_id, task_key)): Path<(String, String)>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let result = state
        .ctx
        .board
        .toggle_task(job_id, TaskKey::new(task_key))
        .await;
    outcome_response(&state, result, trace_id)
}

/// Sets one task's status (approve, reject, ask for approval, reset).
async fn set_task_status(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path((job_id, task_key)): Path<(String, String)>,
    Json(payload): Json<TaskStatusRequest>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Some(status) = TaskStatus::parse(&payload.status) else {
        return problem(
            StatusCode::BAD_REQUEST,
            GD_REQUEST_MALFORMED,
            Some(format!("unknown task status '{}'", payload.status)),
            None,
            trace_id,
        );
    };
    let result = state
        .ctx
        .board
        .set_task_status(job_id, TaskKey::new(task_key), status)
        .await;
    outcome_response(&state, result, trace_id)
}

async fn work_complete(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(job_id): Path<String>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let result = state.ctx.board.mark_work_complete(job_id).await;
    outcome_response(&state, result, trace_id)
}

async fn quality_check(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(job_id): Path<String>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let result = state.ctx.board.mark_quality_check(job_id).await;
    outcome_response(&state, result, trace_id)
}

async fn deliver(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    Path(job_id): Path<String>,
) -> Response {
    let trace_id = Some(trace_id.0.clone());
    let job_id = match parse_job_id(&job_id, trace_id.clone()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let result = state.ctx.board.mark_delivered(job_id).await;
    outcome_response(&state, result, trace_id)
}
