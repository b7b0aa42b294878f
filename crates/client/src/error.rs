use taskboard_core::contract::{ErrorBody, ValidationFailure};
use taskboard_core::workflow::TransitionError;

/// Errors from the client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request was rejected locally and never sent.
    #[error("Invalid request: {0}")]
    Invalid(#[from] ValidationFailure),

    /// The server answered with a non-2xx status and the shared error body.
    #[error("{} ({status})", body.error)]
    Api { status: u16, body: ErrorBody },

    /// Non-2xx response whose body is not the shared error shape.
    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },

    /// The board does not permit the requested column move.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl ClientError {
    /// HTTP status of a server-side rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::Unexpected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Text suitable for showing to a user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { body, .. } => body.error.clone(),
            ClientError::Invalid(failure) => failure.to_string(),
            other => other.to_string(),
        }
    }
}
