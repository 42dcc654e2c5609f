use diesel::prelude::*;

use super::schema::comments;
use crate::api::{Comment, CommentDraft, CommentId};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: i64,
    pub slug: String,
    pub body: String,
    pub author: String,
}

/// Insert and update payload. The same columns are written in both cases, so
/// an update overwrites every mutable field.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = comments)]
pub struct CommentChangesRow<'a> {
    pub slug: &'a str,
    pub body: &'a str,
    pub author: &'a str,
}

impl<'a> From<&'a CommentDraft> for CommentChangesRow<'a> {
    fn from(draft: &'a CommentDraft) -> Self {
        Self {
            slug: &draft.slug,
            body: &draft.body,
            author: &draft.author,
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        // BIGSERIAL ids start at 1, so the sign bit is never set.
        Comment {
            id: CommentId::new(row.id as u64),
            slug: row.slug,
            body: row.body,
            author: row.author,
        }
    }
}
