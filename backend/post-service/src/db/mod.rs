/// Database access layer
///
/// `PostStore` is the persistence seam for the post aggregate. Mutations are
/// saved as whole aggregates, guarded by the version the caller loaded, so a
/// save racing another writer fails with `VersionConflict` instead of
/// silently overwriting it.
pub mod memory;
pub mod post_repo;

pub use memory::InMemoryPostStore;
pub use post_repo::PgPostStore;

use crate::config::DatabaseConfig;
use crate::models::Post;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Post {post_id} changed since version {expected}")]
    VersionConflict { post_id: Uuid, expected: i64 },

    #[error("Post {0} not found")]
    NotFound(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert(&self, post: Post) -> StoreResult<Post>;

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Post>>;

    /// All posts, newest first
    async fn list_sorted_by_date_desc(&self) -> StoreResult<Vec<Post>>;

    /// Delete only if `owner` owns the post. Returns whether a row was removed.
    async fn delete_by_id_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;

    /// Persist the full aggregate if the stored version still equals
    /// `post.version()`. Returns the post with its new version.
    async fn save(&self, post: Post) -> StoreResult<Post>;

    /// Cheap round-trip used by readiness probes
    async fn ping(&self) -> StoreResult<()>;
}

/// Create a PostgreSQL connection pool and verify it with a round-trip
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        "Creating database pool: max={}, min={}, acquire_timeout={}s, idle_timeout={}s",
        config.max_connections,
        config.min_connections,
        config.acquire_timeout_secs,
        config.idle_timeout_secs
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!("Database pool created and verified successfully");
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(error = %e, "Database connection verification failed");
            Err(e)
        }
        Err(_) => {
            error!(
                timeout_secs = config.connect_timeout_secs,
                "Database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Database verification timeout",
            )))
        }
    }
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}
