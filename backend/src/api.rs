//! Public API surface for the comments backend.
//!
//! This file consolidates the entity and payload types shared by the HTTP
//! layer, the service layer and the repositories. All types derive
//! Serialize/Deserialize for JSON serialization.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Comment identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl CommentId {
    pub fn new(value: u64) -> Self {
        CommentId(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = std::num::ParseIntError;

    /// Parses a decimal, non-negative identifier as it appears in a URL path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(CommentId)
    }
}

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub slug: String,
    pub body: String,
    pub author: String,
}

impl Comment {
    /// Materialize a draft under a store-assigned identifier.
    pub fn from_draft(id: CommentId, draft: &CommentDraft) -> Self {
        Self {
            id,
            slug: draft.slug.clone(),
            body: draft.body.clone(),
            author: draft.author.clone(),
        }
    }

    /// Overwrite every mutable field with the draft's values. The id is kept.
    pub fn apply(&mut self, draft: &CommentDraft) {
        self.slug = draft.slug.clone();
        self.body = draft.body.clone();
        self.author = draft.author.clone();
    }
}

/// Client-supplied comment payload for create and update.
///
/// An `id` in the incoming JSON is ignored: on create the store assigns one,
/// on update the path parameter wins. Missing text fields decode as empty
/// strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: String,
}

impl CommentDraft {
    pub fn new(
        slug: impl Into<String>,
        body: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            body: body.into(),
            author: author.into(),
        }
    }
}
