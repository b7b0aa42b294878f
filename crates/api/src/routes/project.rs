//! Route definitions for the `/projects` resource.

use axum::routing::get;
use axum::Router;
use taskboard_core::contract::routes::{PROJECT, PROJECTS};

use crate::handlers::project;
use crate::state::AppState;

/// ```text
/// GET    /projects        -> list
/// POST   /projects        -> create
/// GET    /projects/{id}   -> get_by_id (project plus its tasks)
/// PATCH  /projects/{id}   -> update
/// DELETE /projects/{id}   -> delete (cascades to tasks)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(PROJECTS, get(project::list).post(project::create))
        .route(
            PROJECT,
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
}
