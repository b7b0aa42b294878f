pub mod activity;
pub mod auth;
pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every path comes from `taskboard_core::contract::routes`, the table the
/// client builds its requests from.
///
/// ```text
/// /auth/login                    login (public)
/// /auth/user                     current user (requires auth)
/// /auth/logout                   logout (requires auth)
///
/// /projects                      list, create
/// /projects/{id}                 get (with tasks), patch, delete
///
/// /tasks                         list (?projectId=), create
/// /tasks/{id}                    patch, delete
///
/// /activity                      recent entries (?limit=)
/// ```
///
/// Reads are public; every write requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(project::router())
        .merge(task::router())
        .merge(activity::router())
}
