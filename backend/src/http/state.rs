//! Application state for the HTTP server.

use crate::config::ErrorStatusPolicy;
use crate::services::CommentService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Comment service; the only path to persistence
    pub comments: CommentService,
    /// Status code policy for handler errors
    pub error_status_policy: ErrorStatusPolicy,
}

impl AppState {
    /// Create a new application state with the default error status policy.
    pub fn new(comments: CommentService) -> Self {
        Self {
            comments,
            error_status_policy: ErrorStatusPolicy::default(),
        }
    }

    pub fn with_error_status_policy(mut self, policy: ErrorStatusPolicy) -> Self {
        self.error_status_policy = policy;
        self
    }
}
