//! Handlers for the `/projects` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::contract::{CreateProjectRequest, UpdateProjectRequest};
use taskboard_core::models::{Project, ProjectWithTasks};

use crate::error::AppResult;
use crate::extract::{PathId, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let input = input.into_new_project()?;
    let project = state.service.create_project(user.into(), input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = state.service.list_projects().await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<Json<ProjectWithTasks>> {
    let project = state.service.get_project(id).await?;
    Ok(Json(project))
}

/// PATCH /api/v1/projects/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidJson(input): ValidJson<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    let patch = input.into_patch()?;
    let project = state.service.update_project(user.into(), id, patch).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Deletes the project's tasks first; activity history is kept.
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    state.service.delete_project(user.into(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
