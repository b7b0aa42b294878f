use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskboard_core::contract::{codes, ErrorBody, ValidationFailure};
use taskboard_core::error::CoreError;
use taskboard_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Every variant renders as the shared [`ErrorBody`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// An internal error with a message that is logged, never returned.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationFailure> for AppError {
    fn from(failure: ValidationFailure) -> Self {
        AppError::Core(CoreError::Validation(failure))
    }
}

fn internal() -> (StatusCode, ErrorBody) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::new(codes::INTERNAL_ERROR, "An internal error occurred"),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    ErrorBody::new(codes::NOT_FOUND, format!("{entity} with id {id} not found")),
                ),
                CoreError::Validation(failure) => {
                    (StatusCode::BAD_REQUEST, ErrorBody::validation(failure))
                }
                CoreError::Unauthorized(msg) => (
                    StatusCode::UNAUTHORIZED,
                    ErrorBody::new(codes::UNAUTHORIZED, msg.clone()),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Store(store) => classify_store_error(store),

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Map a store failure onto a status and body. Anything unexpected is
/// logged and returned as a sanitized 500.
fn classify_store_error(err: &StoreError) -> (StatusCode, ErrorBody) {
    match err {
        StoreError::MissingReference { entity, id } => (
            StatusCode::NOT_FOUND,
            ErrorBody::new(codes::NOT_FOUND, format!("{entity} with id {id} not found")),
        ),
        StoreError::Conflict(msg) => (
            StatusCode::CONFLICT,
            ErrorBody::new(codes::CONFLICT, msg.clone()),
        ),
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        StoreError::Corrupt { .. } => {
            tracing::error!(error = %err, "Stored row failed to decode");
            internal()
        }
    }
}
