use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{NewPost, Post, PostSummary};
use super::posts::PostStore;

/// Process-local post store, used by `serve --memory` and the test suite.
/// Mirrors the table's unique title constraint.
#[derive(Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed post as-is (fixtures)
    pub async fn insert(&self, post: Post) {
        self.posts.write().await.push(post);
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, user_id: i64, post: NewPost) -> Result<Post, DatabaseError> {
        let mut posts = self.posts.write().await;

        if posts.iter().any(|p| p.title == post.title) {
            return Err(DatabaseError::UniqueViolation("posts_title_key".to_string()));
        }

        let id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let created = Post {
            id,
            title: post.title,
            body: post.body,
            tags: post.tags,
            status: post.status,
            user_id,
            created_at: Utc::now(),
        };
        posts.push(created.clone());
        Ok(created)
    }

    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<PostSummary>, DatabaseError> {
        let posts = self.posts.read().await;
        let mut published: Vec<&Post> = posts.iter().filter(|p| p.is_published()).collect();
        published.sort_by_key(|p| p.id);

        Ok(published
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(Post::summary)
            .collect())
    }

    async fn count_published(&self) -> Result<i64, DatabaseError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().filter(|p| p.is_published()).count() as i64)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
