//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use tracing::debug;

use crate::api::{Comment, CommentDraft, CommentId};
use crate::db::repository::{CommentRepository, ErrorContext, RepositoryError, RepositoryResult};

mod models;
mod schema;

use models::*;
use schema::comments;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// Unset tuning variables fall back to their defaults; set but
    /// unparseable ones are errors. Only the connection string is required.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size)?,
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size)?,
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec)?,
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec)?,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| format!("invalid value '{}' for {}: {}", raw, key, e)),
        Err(_) => Ok(default),
    }
}

/// Diesel-backed comment repository for Postgres.
///
/// Each operation checks a connection out of the pool on a blocking thread,
/// runs exactly one statement, and returns the connection.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.pool.state();
        f.debug_struct("PostgresRepository")
            .field("connections", &state.connections)
            .field("idle_connections", &state.idle_connections)
            .finish()
    }
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_context(
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool
                .get()
                .map_err(|e| RepositoryError::from(e).with_operation("run_migrations"))?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(format!("Migration failed: {}", e))
                .with_operation("run_migrations")
        })?;

        Ok(())
    }

    /// Execute a database operation on a pooled connection.
    ///
    /// Diesel is synchronous, so the closure runs under `spawn_blocking`.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::from(e).with_operation(operation)
            })?;
            debug!(operation, "running postgres statement");
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal(format!("Task join error: {}", e)).with_operation(operation)
        })?
    }
}

/// Convert an API identifier into the `BIGINT` key space.
///
/// Identifiers beyond `i64::MAX` cannot have been assigned, so they are
/// reported as missing rows.
fn primary_key(id: CommentId, operation: &str) -> RepositoryResult<i64> {
    i64::try_from(id.value()).map_err(|_| missing(id, operation))
}

fn missing(id: CommentId, operation: &str) -> RepositoryError {
    RepositoryError::not_found(format!("comment {} does not exist", id))
        .with_operation(operation)
        .with_entity("comment", id)
}

fn map_diesel_error(err: diesel::result::Error, id: CommentId, operation: &str) -> RepositoryError {
    match err {
        diesel::result::Error::NotFound => missing(id, operation),
        other => RepositoryError::from(other)
            .with_operation(operation)
            .with_entity("comment", id),
    }
}

#[async_trait]
impl CommentRepository for PostgresRepository {
    async fn get_comment(&self, id: CommentId) -> RepositoryResult<Comment> {
        let pk = primary_key(id, "get_comment")?;
        self.with_conn("get_comment", move |conn| {
            comments::table
                .find(pk)
                .select(CommentRow::as_select())
                .first(conn)
                .map(Comment::from)
                .map_err(|e| map_diesel_error(e, id, "get_comment"))
        })
        .await
    }

    async fn list_comments(&self) -> RepositoryResult<Vec<Comment>> {
        self.with_conn("list_comments", |conn| {
            let rows = comments::table
                .order(comments::id.asc())
                .select(CommentRow::as_select())
                .load(conn)
                .map_err(|e| RepositoryError::from(e).with_operation("list_comments"))?;
            Ok(rows.into_iter().map(Comment::from).collect())
        })
        .await
    }

    async fn insert_comment(&self, draft: &CommentDraft) -> RepositoryResult<Comment> {
        let draft = draft.clone();
        self.with_conn("insert_comment", move |conn| {
            diesel::insert_into(comments::table)
                .values(CommentChangesRow::from(&draft))
                .returning(CommentRow::as_returning())
                .get_result(conn)
                .map(Comment::from)
                .map_err(|e| RepositoryError::from(e).with_operation("insert_comment"))
        })
        .await
    }

    async fn update_comment(
        &self,
        id: CommentId,
        draft: &CommentDraft,
    ) -> RepositoryResult<Comment> {
        let pk = primary_key(id, "update_comment")?;
        let draft = draft.clone();
        self.with_conn("update_comment", move |conn| {
            let changes = CommentChangesRow::from(&draft);
            diesel::update(comments::table.find(pk))
                .set((&changes, comments::updated_at.eq(diesel::dsl::now)))
                .returning(CommentRow::as_returning())
                .get_result(conn)
                .map(Comment::from)
                .map_err(|e| map_diesel_error(e, id, "update_comment"))
        })
        .await
    }

    async fn delete_comment(&self, id: CommentId) -> RepositoryResult<()> {
        let pk = primary_key(id, "delete_comment")?;
        self.with_conn("delete_comment", move |conn| {
            let deleted = diesel::delete(comments::table.find(pk))
                .execute(conn)
                .map_err(|e| map_diesel_error(e, id, "delete_comment"))?;
            if deleted == 0 {
                return Err(missing(id, "delete_comment"));
            }
            Ok(())
        })
        .await
    }
}
