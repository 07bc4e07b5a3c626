use super::{PostStore, StoreError, StoreResult};
use crate::models::{Comment, Like, Post};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

/// Upper bound for readiness round-trips
const PING_TIMEOUT: Duration = Duration::from_secs(2);

const POST_COLUMNS: &str =
    "id, user_id, text, name, avatar, likes, comments, created_at, version";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    text: String,
    name: Option<String>,
    avatar: Option<String>,
    likes: Json<Vec<Like>>,
    comments: Json<Vec<Comment>>,
    created_at: DateTime<Utc>,
    version: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post::restore(
            row.id,
            row.user_id,
            row.text,
            row.name,
            row.avatar,
            row.likes.0,
            row.comments.0,
            row.created_at,
            row.version,
        )
    }
}

/// PostgreSQL-backed store; likes and comments live in JSONB columns on the post row.
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: Uuid) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn insert(&self, post: Post) -> StoreResult<Post> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            INSERT INTO posts (id, user_id, text, name, avatar, likes, comments, created_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.id())
        .bind(post.owner())
        .bind(post.text())
        .bind(post.name())
        .bind(post.avatar())
        .bind(Json(post.likes()))
        .bind(Json(post.comments()))
        .bind(post.date())
        .bind(post.version())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Post::from))
    }

    async fn list_sorted_by_date_desc(&self) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn delete_by_id_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn save(&self, post: Post) -> StoreResult<Post> {
        // Only the embedded collections are mutable after creation
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            UPDATE posts
            SET likes = $2, comments = $3, version = version + 1
            WHERE id = $1 AND version = $4
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.id())
        .bind(Json(post.likes()))
        .bind(Json(post.comments()))
        .bind(post.version())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = row {
            return Ok(row.into());
        }

        if self.exists(post.id()).await? {
            Err(StoreError::VersionConflict {
                post_id: post.id(),
                expected: post.version(),
            })
        } else {
            Err(StoreError::NotFound(post.id()))
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        match tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool)).await
        {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(StoreError::Unavailable(format!(
                "ping did not complete within {}s",
                PING_TIMEOUT.as_secs()
            ))),
        }
    }
}
