//! Handlers for the `/tasks` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::contract::{CreateTaskRequest, TaskListQuery, UpdateTaskRequest};
use taskboard_core::models::Task;

use crate::error::AppResult;
use crate::extract::{PathId, ValidJson, ValidQuery};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/tasks?projectId={id}
///
/// Without `projectId`, every task is returned.
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<TaskListQuery>,
) -> AppResult<Json<Vec<Task>>> {
    let scope = query.project_scope()?;
    let tasks = state.service.list_tasks(scope).await?;
    Ok(Json(tasks))
}

/// POST /api/v1/tasks
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let input = input.into_new_task()?;
    let task = state.service.create_task(user.into(), input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/v1/tasks/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(input): ValidJson<UpdateTaskRequest>,
) -> AppResult<Json<Task>> {
    let patch = input.into_patch()?;
    let task = state.service.update_task(user.into(), id, patch).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    state.service.delete_task(user.into(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
