//! Integration tests for the Postgres repository.
//!
//! These need a reachable database and are skipped unless `DATABASE_URL`
//! (or `PG_DATABASE_URL`) is set.

#![cfg(feature = "postgres-repo")]

use comments_service::api::{CommentDraft, CommentId};
use comments_service::db::repository::CommentRepository;
use comments_service::db::{PostgresConfig, PostgresRepository, RepositoryFactory};

async fn repository() -> Option<std::sync::Arc<PostgresRepository>> {
    let config = match PostgresConfig::from_env() {
        Ok(config) => config,
        Err(_) => {
            eprintln!("skipping: DATABASE_URL not set");
            return None;
        }
    };
    Some(
        RepositoryFactory::create_postgres(&config)
            .await
            .expect("failed to connect to test database"),
    )
}

#[tokio::test]
async fn test_postgres_crud_roundtrip() {
    let Some(repo) = repository().await else {
        return;
    };

    let stored = repo
        .insert_comment(&CommentDraft::new("pg", "hello", "alice"))
        .await
        .unwrap();
    assert_eq!(repo.get_comment(stored.id).await.unwrap(), stored);

    let updated = repo
        .update_comment(stored.id, &CommentDraft::new("pg", "edited", "alice"))
        .await
        .unwrap();
    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.body, "edited");

    assert!(repo
        .list_comments()
        .await
        .unwrap()
        .iter()
        .any(|c| c.id == stored.id));

    repo.delete_comment(stored.id).await.unwrap();
    assert!(repo.get_comment(stored.id).await.unwrap_err().is_not_found());
    assert!(repo.delete_comment(stored.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_postgres_out_of_range_id_is_not_found() {
    let Some(repo) = repository().await else {
        return;
    };

    let err = repo.get_comment(CommentId::new(u64::MAX)).await.unwrap_err();
    assert!(err.is_not_found());
}
