//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use derive_more::{Display, Error};
use serde_json::json;
use tracing::error;

use crate::{BackendError, BackendErrorKind, PlayError, PlayErrorKind};

/// An error returned by a handler, rendered as `{"error": message}`.
#[derive(Debug, Clone, Display, Error)]
#[display("{status}: {message}")]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Message shown to the user.
    pub message: String,
}

impl ApiError {
    /// Creates an error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A malformed request.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Logs `err` and replaces its message with `message`, keeping the
    /// status. Used where the page shows a fixed banner.
    pub fn page(err: BackendError, message: &str) -> Self {
        error!(error = %err, "{}", message);
        Self::new(status_for(err.kind), message)
    }
}

fn status_for(kind: BackendErrorKind) -> StatusCode {
    match kind {
        BackendErrorKind::Auth | BackendErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        BackendErrorKind::Forbidden => StatusCode::FORBIDDEN,
        BackendErrorKind::NotFound => StatusCode::NOT_FOUND,
        BackendErrorKind::Transport | BackendErrorKind::Http(_) | BackendErrorKind::Decode => {
            StatusCode::BAD_GATEWAY
        }
        BackendErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        Self::new(status_for(err.kind), err.message)
    }
}

impl From<PlayError> for ApiError {
    fn from(err: PlayError) -> Self {
        let status = match err.kind {
            PlayErrorKind::NotFound => StatusCode::NOT_FOUND,
            PlayErrorKind::Rejected => StatusCode::CONFLICT,
            PlayErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
