//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing,
//! panic isolation, error status policy), and creates the axum router ready
//! for serving.

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use uuid::Uuid;

use super::error::{apply_error_status_policy, handle_panic};
use super::handlers;
use super::state::AppState;

/// Comment payloads are small; anything larger is rejected before decoding.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/comments",
            get(handlers::get_all_comments).post(handlers::post_comment),
        )
        .route(
            "/comments/{id}",
            get(handlers::get_comment)
                .put(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
        .route("/health", get(handlers::health_check));

    with_middleware(Router::new().nest("/api", api), state)
}

/// Wrap routes in the middleware stack and attach state.
fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request| {
        info_span!(
            "request",
            request_id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    routes
        .layer(middleware::map_response_with_state(
            state.clone(),
            apply_error_status_policy,
        ))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(trace)
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, StatusCode},
    };
    use serde::ser::{Error as _, Serialize, Serializer};
    use tower::ServiceExt;

    use crate::config::ErrorStatusPolicy;
    use crate::db::repositories::LocalRepository;
    use crate::http::dto::ApiResponse;
    use crate::http::error::HANDLER_PANICKED;
    use crate::http::response::{JsonBody, ENCODE_FAILED, JSON_CONTENT_TYPE};
    use crate::services::CommentService;

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot encode"))
        }
    }

    async fn exploding() -> &'static str {
        panic!("handler exploded")
    }

    async fn unencodable() -> JsonBody<Unencodable> {
        JsonBody(Unencodable)
    }

    fn state(policy: ErrorStatusPolicy) -> AppState {
        let service = CommentService::new(Arc::new(LocalRepository::new()));
        AppState::new(service).with_error_status_policy(policy)
    }

    async fn call(app: &Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, body.to_vec())
    }

    #[test]
    fn test_router_creation() {
        let _router = create_router(state(ErrorStatusPolicy::Mapped));
    }

    #[tokio::test]
    async fn test_panic_is_confined_to_its_request() {
        let routes = Router::new()
            .route("/boom", get(exploding))
            .route("/health", get(handlers::health_check));
        let app = with_middleware(routes, state(ErrorStatusPolicy::Mapped));

        let (status, content_type, body) = call(&app, "/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(content_type.as_deref(), Some(JSON_CONTENT_TYPE));
        let envelope: ApiResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(envelope.message, HANDLER_PANICKED);
        assert_eq!(envelope.error.as_deref(), Some("handler exploded"));

        let (status, _, _) = call(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_encode_failure_goes_through_the_stack() {
        for policy in [ErrorStatusPolicy::Mapped, ErrorStatusPolicy::Uniform] {
            let routes = Router::new()
                .route("/unencodable", get(unencodable))
                .route("/health", get(handlers::health_check));
            let app = with_middleware(routes, state(policy));

            let (status, content_type, body) = call(&app, "/unencodable").await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(content_type.as_deref(), Some(JSON_CONTENT_TYPE));
            let envelope: ApiResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(envelope.message, ENCODE_FAILED);

            let (status, _, _) = call(&app, "/health").await;
            assert_eq!(status, StatusCode::OK);
        }
    }
}
