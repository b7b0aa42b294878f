//! Handlers for the `/auth` resource (login, current user, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::contract::{LoginRequest, LoginResponse, ValidationFailure};
use taskboard_core::error::CoreError;
use taskboard_core::models::User;
use taskboard_core::types::entity;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    input.validate().map_err(ValidationFailure::from)?;

    let creds = state
        .store
        .find_user_by_username(input.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_valid = verify_password(&input.password, &creds.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(username = %creds.user.username, "Rejected login");
        return Err(invalid_credentials());
    }

    let access_token = generate_access_token(creds.user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    tracing::info!(user_id = creds.user.id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: creds.user,
    }))
}

/// GET /api/v1/auth/user
pub async fn current_user(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .find_user(auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: entity::USER,
            id: auth_user.user_id,
        }))?;
    Ok(Json(user))
}

/// POST /api/v1/auth/logout
///
/// Tokens are stateless; the client discards its copy. Returns 204 No Content.
pub async fn logout(auth_user: AuthUser) -> StatusCode {
    tracing::info!(user_id = auth_user.user_id, "User logged out");
    StatusCode::NO_CONTENT
}
