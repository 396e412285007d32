//! Post persistence.
//!
//! Expected table (managed outside this service):
//!
//! ```sql
//! CREATE TABLE posts (
//!     id          BIGSERIAL PRIMARY KEY,
//!     title       TEXT NOT NULL UNIQUE,
//!     body        TEXT NOT NULL,
//!     tags        TEXT[] NOT NULL DEFAULT '{}',
//!     status      TEXT NOT NULL,
//!     user_id     BIGINT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
//! );
//! ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{NewPost, Post, PostRow, PostStatus, PostSummary};

/// Data-access seam used by the handlers
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post owned by `user_id`; the store assigns id and creation time
    async fn create(&self, user_id: i64, post: NewPost) -> Result<Post, DatabaseError>;

    /// Published posts ordered by id, skipping `offset` and returning at most `limit`
    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<PostSummary>, DatabaseError>;

    async fn count_published(&self) -> Result<i64, DatabaseError>;

    /// Any post by id regardless of status
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

const POST_COLUMNS: &str = "id, title, body, tags, status, user_id, created_at";

pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_post(row: PostRow) -> Result<Post, DatabaseError> {
    let id = row.id;
    Post::try_from(row).map_err(|e| DatabaseError::Corrupt(format!("post {}: {}", id, e)))
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, user_id: i64, post: NewPost) -> Result<Post, DatabaseError> {
        let sql = format!(
            "INSERT INTO posts (title, body, tags, status, user_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&post.title)
            .bind(&post.body)
            .bind(&post.tags)
            .bind(post.status.as_str())
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        row_to_post(row)
    }

    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<PostSummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, PostSummary>(
            "SELECT id, title, body, tags, created_at FROM posts WHERE status = $1 ORDER BY id OFFSET $2 LIMIT $3",
        )
        .bind(PostStatus::Published.as_str())
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn count_published(&self) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE status = $1")
            .bind(PostStatus::Published.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_post).transpose()
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
