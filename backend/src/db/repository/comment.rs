//! Comment repository trait for CRUD operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{Comment, CommentDraft, CommentId};

/// Repository trait for comment persistence.
///
/// Implementations own the durable comment state and assign identifiers on
/// insert. Every call is a round trip to storage; nothing is cached above
/// this trait.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Retrieve a comment by primary key.
    ///
    /// # Returns
    /// * `Ok(Comment)` - The stored comment
    /// * `Err(RepositoryError::NotFound)` - If no row matches
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_comment(&self, id: CommentId) -> RepositoryResult<Comment>;

    /// List every stored comment. Order is not part of the contract.
    async fn list_comments(&self) -> RepositoryResult<Vec<Comment>>;

    /// Insert a new comment and return it with its assigned id.
    async fn insert_comment(&self, draft: &CommentDraft) -> RepositoryResult<Comment>;

    /// Overwrite all mutable fields of an existing comment.
    ///
    /// # Returns
    /// * `Ok(Comment)` - The updated comment, still carrying `id`
    /// * `Err(RepositoryError::NotFound)` - If no row matches
    async fn update_comment(&self, id: CommentId, draft: &CommentDraft)
        -> RepositoryResult<Comment>;

    /// Hard-delete a comment.
    ///
    /// # Returns
    /// * `Ok(())` - The row was removed
    /// * `Err(RepositoryError::NotFound)` - If no row matches
    async fn delete_comment(&self, id: CommentId) -> RepositoryResult<()>;
}
