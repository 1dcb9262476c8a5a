pub mod health;

use std::any::Any;

use axum::{
    http::Uri,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::analysis::handlers::handle_analyze_job;
use crate::errors::AppError;
use crate::jobs::handlers;
use crate::state::AppState;

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Turns a handler panic into the same opaque 500 as any other internal fault.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(health::health_handler).fallback(method_not_allowed),
        )
        .route(
            "/jobs",
            get(handlers::handle_list_jobs)
                .post(handlers::handle_create_job)
                .fallback(method_not_allowed),
        )
        .route(
            "/jobs/:id",
            put(handlers::handle_update_job)
                .delete(handlers::handle_delete_job)
                .fallback(method_not_allowed),
        )
        .route(
            "/analyze",
            post(handle_analyze_job).fallback(method_not_allowed),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
}
