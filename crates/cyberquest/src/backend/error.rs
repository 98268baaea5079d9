//! Backend error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong talking to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BackendErrorKind {
    /// The request never produced a response.
    #[display("transport")]
    Transport,
    /// The backend answered with a non-success status.
    #[display("http {_0}")]
    Http(u16),
    /// Credentials were rejected or a sign-up was refused.
    #[display("auth")]
    Auth,
    /// The operation needs a signed-in user.
    #[display("unauthenticated")]
    Unauthenticated,
    /// The operation is not allowed for this user.
    #[display("forbidden")]
    Forbidden,
    /// A row or catalog entry that must exist does not.
    #[display("not found")]
    NotFound,
    /// A response body did not have the expected shape.
    #[display("decode")]
    Decode,
    /// Local state could not be accessed.
    #[display("internal")]
    Internal,
}

/// Backend error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Backend error ({}): {} at {}:{}", kind, message, file, line)]
pub struct BackendError {
    /// Error category.
    pub kind: BackendErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BackendError {
    /// Creates a new backend error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a missing row or entry.
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::NotFound, message)
    }

    /// Shorthand for an operation attempted while signed out.
    #[track_caller]
    pub fn unauthenticated() -> Self {
        Self::new(BackendErrorKind::Unauthenticated, "Not signed in")
    }
}

impl From<reqwest::Error> for BackendError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_decode() {
            BackendErrorKind::Decode
        } else {
            match err.status() {
                Some(status) => BackendErrorKind::Http(status.as_u16()),
                None => BackendErrorKind::Transport,
            }
        };
        Self::new(kind, format!("Request failed: {}", err))
    }
}

impl From<serde_json::Error> for BackendError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(BackendErrorKind::Decode, format!("JSON error: {}", err))
    }
}
