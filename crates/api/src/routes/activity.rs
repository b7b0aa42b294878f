use axum::routing::get;
use axum::Router;
use taskboard_core::contract::routes::ACTIVITY;

use crate::handlers::activity;
use crate::state::AppState;

/// `GET /activity` (optional `?limit=`, at most 20).
pub fn router() -> Router<AppState> {
    Router::new().route(ACTIVITY, get(activity::list_recent))
}
