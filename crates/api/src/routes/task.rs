//! Route definitions for the `/tasks` resource.

use axum::routing::{get, patch};
use axum::Router;
use taskboard_core::contract::routes::{TASK, TASKS};

use crate::handlers::task;
use crate::state::AppState;

/// ```text
/// GET    /tasks        -> list (optional ?projectId=)
/// POST   /tasks        -> create
/// PATCH  /tasks/{id}   -> update
/// DELETE /tasks/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(TASKS, get(task::list).post(task::create))
        .route(TASK, patch(task::update).delete(task::delete))
}
