use axum::extract::State;
use axum::Json;
use taskboard_core::contract::ActivityQuery;
use taskboard_core::models::ActivityWithActor;

use crate::error::AppResult;
use crate::extract::ValidQuery;
use crate::state::AppState;

/// GET /api/v1/activity?limit={n}
///
/// Newest first, each entry joined with its actor when the user still exists.
pub async fn list_recent(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<ActivityQuery>,
) -> AppResult<Json<Vec<ActivityWithActor>>> {
    let entries = state
        .service
        .recent_activity(query.effective_limit())
        .await?;
    Ok(Json(entries))
}
