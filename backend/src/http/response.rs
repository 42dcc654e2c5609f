//! JSON success responses with explicit encoding.

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use super::error::AppError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
pub const ENCODE_FAILED: &str = "Failed to encode response";

/// 200 response whose body is `T` serialized as JSON.
///
/// A serialization failure becomes an [`AppError`], logged and answered with
/// the error envelope for this request only.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T: Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
                bytes,
            )
                .into_response(),
            Err(err) => AppError::internal(ENCODE_FAILED, err).into_response(),
        }
    }
}
