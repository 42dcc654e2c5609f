//! Repository trait definitions for database operations.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`comment`]: CRUD operations for comments

pub mod comment;
pub mod error;

pub use comment::CommentRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
