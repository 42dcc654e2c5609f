//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`CommentRepository`]
//! suitable for unit testing and local development. All data lives in a
//! `BTreeMap` behind a lock, giving fast, deterministic and isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{Comment, CommentDraft, CommentId};
use crate::db::repository::{CommentRepository, ErrorContext, RepositoryError, RepositoryResult};

/// In-memory local repository.
///
/// Cloning shares the underlying store, so a test can keep a handle while the
/// service owns another.
///
/// # Example
/// ```
/// use comments_service::api::CommentDraft;
/// use comments_service::db::repositories::LocalRepository;
/// use comments_service::db::repository::CommentRepository;
///
/// #[tokio::main]
/// async fn main() {
///     let repo = LocalRepository::new();
///     let draft = CommentDraft::new("s1", "hello", "alice");
///     let stored = repo.insert_comment(&draft).await.unwrap();
///     assert_eq!(stored.id.value(), 1);
/// }
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    comments: BTreeMap<CommentId, Comment>,
    next_id: u64,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            comments: BTreeMap::new(),
            next_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository. Identifiers restart at 1.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of comments stored.
    pub fn comment_count(&self) -> usize {
        self.data.read().comments.len()
    }

    fn ensure_healthy(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if data.is_healthy {
            Ok(())
        } else {
            Err(
                RepositoryError::connection("local repository is marked unhealthy")
                    .with_context(ErrorContext::new(operation).with_entity("comment")),
            )
        }
    }

    fn missing(id: CommentId, operation: &str) -> RepositoryError {
        RepositoryError::not_found(format!("comment {} does not exist", id))
            .with_operation(operation)
            .with_entity("comment", id)
    }
}

#[async_trait]
impl CommentRepository for LocalRepository {
    async fn get_comment(&self, id: CommentId) -> RepositoryResult<Comment> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "get_comment")?;
        data.comments
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::missing(id, "get_comment"))
    }

    async fn list_comments(&self) -> RepositoryResult<Vec<Comment>> {
        let data = self.data.read();
        Self::ensure_healthy(&data, "list_comments")?;
        Ok(data.comments.values().cloned().collect())
    }

    async fn insert_comment(&self, draft: &CommentDraft) -> RepositoryResult<Comment> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "insert_comment")?;
        let id = CommentId::new(data.next_id);
        data.next_id += 1;
        let comment = Comment::from_draft(id, draft);
        data.comments.insert(id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        id: CommentId,
        draft: &CommentDraft,
    ) -> RepositoryResult<Comment> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "update_comment")?;
        let comment = data
            .comments
            .get_mut(&id)
            .ok_or_else(|| Self::missing(id, "update_comment"))?;
        comment.apply(draft);
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: CommentId) -> RepositoryResult<()> {
        let mut data = self.data.write();
        Self::ensure_healthy(&data, "delete_comment")?;
        data.comments
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::missing(id, "delete_comment"))
    }
}
