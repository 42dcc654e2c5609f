//! Tests for db::repository::error module.

use comments_service::db::repository::{ErrorContext, RepositoryError};

#[test]
fn test_error_context_new() {
    let ctx = ErrorContext::new("test_operation");
    assert_eq!(ctx.operation, Some("test_operation".to_string()));
    assert!(ctx.entity.is_none());
    assert!(ctx.entity_id.is_none());
    assert!(ctx.details.is_none());
}

#[test]
fn test_error_context_chaining() {
    let ctx = ErrorContext::new("update_comment")
        .with_entity("comment")
        .with_entity_id(42)
        .with_details("row vanished");

    assert_eq!(ctx.operation, Some("update_comment".to_string()));
    assert_eq!(ctx.entity, Some("comment".to_string()));
    assert_eq!(ctx.entity_id, Some("42".to_string()));
    assert_eq!(ctx.details, Some("row vanished".to_string()));
}

#[test]
fn test_error_context_display() {
    let ctx = ErrorContext::new("get_comment")
        .with_entity("comment")
        .with_entity_id("123");

    let display = format!("{}", ctx);
    assert!(display.contains("operation=get_comment"));
    assert!(display.contains("entity=comment"));
    assert!(display.contains("id=123"));
}

#[test]
fn test_empty_context_displays_nothing() {
    assert_eq!(format!("{}", ErrorContext::default()), "");
}

#[test]
fn test_error_display_prefixes() {
    assert_eq!(
        RepositoryError::connection("refused").to_string(),
        "Connection error: refused"
    );
    assert_eq!(RepositoryError::query("bad sql").to_string(), "Query error: bad sql");
    assert_eq!(
        RepositoryError::not_found("comment 9 does not exist").to_string(),
        "Not found: comment 9 does not exist"
    );
    assert_eq!(
        RepositoryError::configuration("missing url").to_string(),
        "Configuration error: missing url"
    );
    assert_eq!(
        RepositoryError::internal("join failed").to_string(),
        "Internal error: join failed"
    );
}

#[test]
fn test_error_display_includes_context() {
    let err = RepositoryError::not_found("comment 7 does not exist")
        .with_context(ErrorContext::new("delete_comment").with_entity_id(7));
    let display = err.to_string();
    assert!(display.starts_with("Not found: comment 7 does not exist ["));
    assert!(display.contains("operation=delete_comment"));
    assert!(display.contains("id=7"));
}

#[test]
fn test_is_not_found() {
    assert!(RepositoryError::not_found("x").is_not_found());
    assert!(!RepositoryError::connection("x").is_not_found());
    assert!(!RepositoryError::query("x").is_not_found());
    assert!(!RepositoryError::internal("x").is_not_found());
}

#[test]
fn test_with_operation_and_entity() {
    let err = RepositoryError::query("timeout")
        .with_operation("list_comments")
        .with_entity("comment", 3);

    let ctx = err.context();
    assert_eq!(ctx.operation.as_deref(), Some("list_comments"));
    assert_eq!(ctx.entity.as_deref(), Some("comment"));
    assert_eq!(ctx.entity_id.as_deref(), Some("3"));
}

#[test]
fn test_with_context_replaces_context() {
    let ctx = ErrorContext::new("insert_comment").with_details("pool exhausted");

    let err = RepositoryError::connection("no connection")
        .with_operation("ignored")
        .with_context(ctx.clone());
    assert_eq!(err.context(), &ctx);

    let err = RepositoryError::internal("join failed").with_context(ctx.clone());
    assert_eq!(err.context(), &ctx);
}

#[cfg(feature = "postgres-repo")]
#[test]
fn test_diesel_not_found_conversion() {
    let err: RepositoryError = diesel::result::Error::NotFound.into();
    assert!(err.is_not_found());
}
