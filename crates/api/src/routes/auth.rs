//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;
use taskboard_core::contract::routes::{AUTH_LOGIN, AUTH_LOGOUT, AUTH_USER};

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /auth/login    -> login
/// GET  /auth/user     -> current_user (requires auth)
/// POST /auth/logout   -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(AUTH_LOGIN, post(auth::login))
        .route(AUTH_USER, get(auth::current_user))
        .route(AUTH_LOGOUT, post(auth::logout))
}
