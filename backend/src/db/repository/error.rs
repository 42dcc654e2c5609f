//! Error types for repository operations.
//!
//! Every variant carries a human-readable message plus an [`ErrorContext`]
//! naming the operation and the comment involved. Only
//! [`RepositoryError::NotFound`] is meaningful to callers; the HTTP layer
//! maps everything else to a server error.

use std::fmt;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a repository error happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Repository method, e.g. `get_comment`
    pub operation: Option<String>,
    /// Always `comment` in this crate; absent for pool-level failures
    pub entity: Option<String>,
    pub entity_id: Option<String>,
    /// Backend-specific detail such as a database error kind
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
            ("details", &self.details),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|&(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
            .collect();

        if parts.is_empty() {
            Ok(())
        } else {
            write!(f, " [{}]", parts.join(", "))
        }
    }
}

/// Failure reported by a [`CommentRepository`](super::CommentRepository).
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The store could not be reached (pool exhausted, unhealthy backend).
    #[error("Connection error: {message}{context}")]
    ConnectionError {
        message: String,
        context: ErrorContext,
    },

    /// A statement failed.
    #[error("Query error: {message}{context}")]
    QueryError {
        message: String,
        context: ErrorContext,
    },

    /// No comment with the requested id.
    #[error("Not found: {message}{context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// The repository could not be built from the given settings.
    #[error("Configuration error: {message}{context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    #[error("Internal error: {message}{context}")]
    InternalError {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::QueryError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Replace the whole context.
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        *self.context_mut() = context;
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    pub fn with_entity(mut self, entity: impl Into<String>, id: impl ToString) -> Self {
        let context = self.context_mut();
        context.entity = Some(entity.into());
        context.entity_id = Some(id.to_string());
        self
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::ConnectionError { context, .. }
            | Self::QueryError { context, .. }
            | Self::NotFound { context, .. }
            | Self::ConfigurationError { context, .. }
            | Self::InternalError { context, .. } => context,
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::Error as Diesel;

        match err {
            Diesel::NotFound => Self::not_found("no matching row"),
            Diesel::DatabaseError(kind, info) => Self::query(info.message())
                .with_context(ErrorContext::default().with_details(format!("{kind:?}"))),
            Diesel::DeserializationError(e) | Diesel::SerializationError(e) => {
                Self::internal(e.to_string())
            }
            other => Self::query(other.to_string()),
        }
    }
}

#[cfg(feature = "postgres-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::connection(err.to_string())
            .with_context(ErrorContext::default().with_details("pool checkout"))
    }
}
