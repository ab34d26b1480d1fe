//! HTTP API layer for the task scheduler.
//!
//! # Responsibility
//! - Route `/api/*` requests to core recurrence and task use cases.
//! - Serve the static web front-end for every other path.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Builds the application router.
///
/// Unsupported methods on an API path answer 405 with the JSON error body.
pub fn build_router(state: Arc<AppState>, web_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route(
            "/api/nextdate",
            get(api::next_date).fallback(api::method_not_allowed),
        )
        .route(
            "/api/task/add",
            post(api::add_task).fallback(api::method_not_allowed),
        )
        .route(
            "/api/tasks",
            get(api::list_tasks).fallback(api::method_not_allowed),
        )
        .route(
            "/api/task",
            get(api::get_task)
                .put(api::update_task)
                .fallback(api::method_not_allowed),
        )
        .fallback_service(ServeDir::new(web_dir.as_ref()))
        .with_state(state)
}
