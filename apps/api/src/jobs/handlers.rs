use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::jobs::models::{JobPayload, JobRecord};
use crate::state::AppState;

/// GET /jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<JobRecord>> {
    Json(state.jobs.list().await)
}

/// POST /jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    payload: Result<Json<JobPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<JobRecord>), AppError> {
    let Json(payload) = payload?;
    let record = state.jobs.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<JobPayload>, JsonRejection>,
) -> Result<Json<JobRecord>, AppError> {
    let Json(payload) = payload?;
    let record = state.jobs.update(&id, &payload).await?;
    Ok(Json(record))
}

/// DELETE /jobs/:id
///
/// Returns the removed record so the caller can show what was deleted.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobRecord>, AppError> {
    let record = state.jobs.delete(&id).await?;
    Ok(Json(record))
}
