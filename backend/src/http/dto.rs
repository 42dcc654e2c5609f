//! Data Transfer Objects for the HTTP API.
//!
//! Comment payloads are the shared [`crate::api`] types. This module adds the
//! acknowledgement/error envelope used by delete, health and every failure.

use serde::{Deserialize, Serialize};

pub use crate::api::{Comment, CommentDraft, CommentId};

pub const HEALTH_MESSAGE: &str = "I am alive!";
pub const DELETED_MESSAGE: &str = "Successfully deleted comment";

/// `{"Message": ..., "Error": ...}` envelope.
///
/// `Error` is omitted on acknowledgements and always present on failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Acknowledgement without an error.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    /// Failure with the underlying error text.
    pub fn error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(error.into()),
        }
    }
}
