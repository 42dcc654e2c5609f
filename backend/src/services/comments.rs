//! Comment service: the business-logic façade over the repository.
//!
//! There are no business rules beyond pass-through; the service exists so the
//! HTTP layer depends on a stable domain API rather than on a storage trait.

use std::sync::Arc;

use tracing::debug;

use crate::api::{Comment, CommentDraft, CommentId};
use crate::db::repository::{CommentRepository, RepositoryResult};

/// CRUD operations on comments.
///
/// Cheap to clone; clones share the same repository handle.
#[derive(Clone)]
pub struct CommentService {
    repository: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(repository: Arc<dyn CommentRepository>) -> Self {
        Self { repository }
    }

    /// Fetch a comment by id. Fails with `NotFound` when no row matches.
    pub async fn get_comment(&self, id: CommentId) -> RepositoryResult<Comment> {
        debug!(comment_id = %id, "get_comment");
        self.repository.get_comment(id).await
    }

    /// Fetch every comment. Ordering is whatever the repository returns.
    pub async fn get_all_comments(&self) -> RepositoryResult<Vec<Comment>> {
        debug!("get_all_comments");
        self.repository.list_comments().await
    }

    /// Store a new comment; the repository assigns the id.
    pub async fn post_comment(&self, draft: &CommentDraft) -> RepositoryResult<Comment> {
        debug!(slug = %draft.slug, "post_comment");
        self.repository.insert_comment(draft).await
    }

    /// Overwrite every mutable field of comment `id` with the draft.
    ///
    /// The path id is authoritative; the draft carries no identity.
    pub async fn update_comment(
        &self,
        id: CommentId,
        draft: &CommentDraft,
    ) -> RepositoryResult<Comment> {
        debug!(comment_id = %id, "update_comment");
        self.repository.update_comment(id, draft).await
    }

    /// Hard-delete comment `id`. Deleting a missing id is `NotFound`, not a no-op.
    pub async fn delete_comment(&self, id: CommentId) -> RepositoryResult<()> {
        debug!(comment_id = %id, "delete_comment");
        self.repository.delete_comment(id).await
    }
}
