//! HTTP error handling and response types.

use std::any::Any;
use std::fmt;

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use super::dto::ApiResponse;
use super::response::JSON_CONTENT_TYPE;
use super::state::AppState;
use crate::config::ErrorStatusPolicy;
use crate::db::repository::RepositoryError;

pub const PARSE_ID_FAILED: &str = "Unable to parse UINT from ID";
pub const DECODE_BODY_FAILED: &str = "Failed to decode JSON body";
pub const HANDLER_PANICKED: &str = "Request handler panicked";

/// Error class, used to pick the status code.
///
/// Inserted into the extensions of every error response so the status policy
/// middleware can recognise handler errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed id or body.
    BadRequest,
    /// The referenced comment does not exist.
    NotFound,
    /// Storage failure or anything unexpected.
    Internal,
}

impl ErrorKind {
    pub fn status(self, policy: ErrorStatusPolicy) -> StatusCode {
        match (policy, self) {
            (ErrorStatusPolicy::Uniform, _) => StatusCode::INTERNAL_SERVER_ERROR,
            (ErrorStatusPolicy::Mapped, ErrorKind::BadRequest) => StatusCode::BAD_REQUEST,
            (ErrorStatusPolicy::Mapped, ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            (ErrorStatusPolicy::Mapped, ErrorKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Application error type for HTTP handlers.
///
/// `message` is the client-facing summary; the underlying error's text goes
/// into the `Error` field of the body.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request (unparseable id or body)
    BadRequest { message: &'static str, error: String },
    /// Repository error
    Repository {
        message: &'static str,
        source: RepositoryError,
    },
    /// Internal server error
    Internal { message: &'static str, error: String },
}

impl AppError {
    pub fn bad_request(message: &'static str, error: impl fmt::Display) -> Self {
        Self::BadRequest {
            message,
            error: error.to_string(),
        }
    }

    pub fn internal(message: &'static str, error: impl fmt::Display) -> Self {
        Self::Internal {
            message,
            error: error.to_string(),
        }
    }

    /// Adapter for `map_err` that tags a repository failure with a message.
    pub fn repository(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| Self::Repository { message, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest { .. } => ErrorKind::BadRequest,
            Self::Repository { source, .. } if source.is_not_found() => ErrorKind::NotFound,
            Self::Repository { .. } | Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::BadRequest { message, .. }
            | Self::Repository { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::BadRequest { error, .. } | Self::Internal { error, .. } => error.clone(),
            Self::Repository { source, .. } => source.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message(), self.detail())
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = self.message();
        let detail = self.detail();

        match kind {
            ErrorKind::BadRequest => warn!(error = %detail, "{}", message),
            ErrorKind::NotFound => info!(error = %detail, "{}", message),
            ErrorKind::Internal => error!(error = %detail, "{}", message),
        }

        let body = serde_json::to_vec(&ApiResponse::error(message, detail))
            .unwrap_or_else(|_| br#"{"Message":"Internal error","Error":""}"#.to_vec());

        let mut response = (
            kind.status(ErrorStatusPolicy::Mapped),
            [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            body,
        )
            .into_response();
        response.extensions_mut().insert(kind);
        response
    }
}

/// Response middleware applying the configured [`ErrorStatusPolicy`].
///
/// Only responses produced by [`AppError`] are touched; router-level 404/405
/// responses keep their status.
pub async fn apply_error_status_policy(
    State(state): State<AppState>,
    mut response: Response,
) -> Response {
    if let Some(kind) = response.extensions().get::<ErrorKind>().copied() {
        *response.status_mut() = kind.status(state.error_status_policy);
    }
    response
}

/// Turn a handler panic into a 500 error envelope for that request.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    AppError::internal(HANDLER_PANICKED, detail).into_response()
}
