//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to
//! [`CommentService`](crate::services::CommentService).

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        Path, State,
    },
};

use super::dto::{ApiResponse, Comment, CommentDraft, CommentId, DELETED_MESSAGE, HEALTH_MESSAGE};
use super::error::{AppError, DECODE_BODY_FAILED, PARSE_ID_FAILED};
use super::response::JsonBody;
use super::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<JsonBody<T>, AppError>;

/// Extracted `{id}` segment. A rejected segment (e.g. invalid UTF-8 after
/// percent-decoding) is reported like any other unparseable id.
type IdSegment = Result<Path<String>, PathRejection>;

/// Extracted request body. Rejections include bodies over the size limit.
type RawBody = Result<Bytes, BytesRejection>;

fn parse_id(raw: &str) -> Result<CommentId, AppError> {
    raw.parse()
        .map_err(|e| AppError::bad_request(PARSE_ID_FAILED, e))
}

fn path_id(segment: IdSegment) -> Result<CommentId, AppError> {
    let Path(raw) = segment.map_err(|e| AppError::bad_request(PARSE_ID_FAILED, e))?;
    parse_id(&raw)
}

/// Decode a draft regardless of the request's content type.
fn decode_draft(body: &[u8]) -> Result<CommentDraft, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::bad_request(DECODE_BODY_FAILED, e))
}

fn body_draft(body: RawBody) -> Result<CommentDraft, AppError> {
    let bytes = body.map_err(|e| AppError::bad_request(DECODE_BODY_FAILED, e))?;
    decode_draft(&bytes)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /api/health
///
/// Liveness probe. Never consults the service.
pub async fn health_check() -> JsonBody<ApiResponse> {
    JsonBody(ApiResponse::message(HEALTH_MESSAGE))
}

// =============================================================================
// Comment CRUD
// =============================================================================

/// GET /api/comments
pub async fn get_all_comments(State(state): State<AppState>) -> HandlerResult<Vec<Comment>> {
    let comments = state
        .comments
        .get_all_comments()
        .await
        .map_err(AppError::repository("Failed to retrieve all comments"))?;

    Ok(JsonBody(comments))
}

/// POST /api/comments
///
/// Any `id` in the body is ignored; the store assigns one.
pub async fn post_comment(State(state): State<AppState>, body: RawBody) -> HandlerResult<Comment> {
    let draft = body_draft(body)?;

    let comment = state
        .comments
        .post_comment(&draft)
        .await
        .map_err(AppError::repository("Failed to add new comment"))?;

    Ok(JsonBody(comment))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    id: IdSegment,
) -> HandlerResult<Comment> {
    let id = path_id(id)?;

    let comment = state
        .comments
        .get_comment(id)
        .await
        .map_err(AppError::repository("Error retrieving comment by ID"))?;

    Ok(JsonBody(comment))
}

/// PUT /api/comments/{id}
///
/// The path id wins over any id in the body.
pub async fn update_comment(
    State(state): State<AppState>,
    id: IdSegment,
    body: RawBody,
) -> HandlerResult<Comment> {
    let draft = body_draft(body)?;
    let id = path_id(id)?;

    let comment = state
        .comments
        .update_comment(id, &draft)
        .await
        .map_err(AppError::repository("Failed to update comment"))?;

    Ok(JsonBody(comment))
}

/// DELETE /api/comments/{id}
///
/// Deleting a missing comment is an error, not a no-op.
pub async fn delete_comment(
    State(state): State<AppState>,
    id: IdSegment,
) -> HandlerResult<ApiResponse> {
    let id = path_id(id)?;

    state
        .comments
        .delete_comment(id)
        .await
        .map_err(AppError::repository("Error deleting comment by ID"))?;

    Ok(JsonBody(ApiResponse::message(DELETED_MESSAGE)))
}
