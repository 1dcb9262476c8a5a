use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::analysis::analyzer::{analyze_with_fallback, JobAnalysis};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobRequest {
    #[serde(default)]
    pub job_description: Option<String>,
}

/// POST /analyze
///
/// Summarizes a pasted job description and suggests three skills to highlight.
/// Upstream failures degrade to static fallback content, still with 200.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    request: Result<Json<AnalyzeJobRequest>, JsonRejection>,
) -> Result<Json<JobAnalysis>, AppError> {
    let Json(request) = request?;
    let job_description = request
        .job_description
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();

    if job_description.is_empty() {
        return Err(AppError::BadRequest(
            "jobDescription cannot be empty".to_string(),
        ));
    }

    let analysis = analyze_with_fallback(
        state.analyzer.as_ref(),
        job_description,
        state.config.analysis_timeout,
    )
    .await;

    Ok(Json(analysis))
}
