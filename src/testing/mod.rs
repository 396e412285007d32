use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::database::models::{NewPost, Post, PostStatus, PostSummary};
use crate::database::{DatabaseError, MemoryPostStore, PostStore};
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret-do-not-use";

/// Test utilities: an in-memory store wrapped in a call counter, plus the
/// keys needed to mint tokens the app will accept
pub struct TestContext {
    pub memory: Arc<MemoryPostStore>,
    pub store: Arc<RecordingStore>,
    pub keys: JwtKeys,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    pub fn new() -> Self {
        let memory = Arc::new(MemoryPostStore::new());
        let store = Arc::new(RecordingStore::new(memory.clone()));
        Self {
            memory,
            store,
            keys: JwtKeys::new(TEST_SECRET, 1),
        }
    }

    /// App state backed by this context's store
    pub fn state(&self) -> AppState {
        AppState::new(self.store.clone(), self.keys.clone())
    }

    /// App state whose store fails every call
    pub fn failing_state(&self) -> AppState {
        AppState::new(Arc::new(FailingStore), self.keys.clone())
    }

    pub fn token_for(&self, id: i64, email: &str) -> anyhow::Result<String> {
        self.keys
            .issue(id, email)
            .map_err(|e| anyhow::anyhow!("Failed to issue test token: {}", e))
    }

    /// Insert a post directly, bypassing validation and the call counter
    pub async fn seed_post(&self, title: &str, status: PostStatus) -> Post {
        let id = self.memory.len().await as i64 + 1;
        let post = Post {
            id,
            title: title.to_string(),
            body: format!("Body of {}", title),
            tags: vec![],
            status,
            user_id: 1,
            created_at: Utc::now(),
        };
        self.memory.insert(post.clone()).await;
        post
    }

    /// Number of store calls made through the app so far
    pub fn store_calls(&self) -> usize {
        self.store.calls()
    }
}

/// Delegates to an inner store and counts every call
pub struct RecordingStore {
    inner: Arc<dyn PostStore>,
    calls: AtomicUsize,
}

impl RecordingStore {
    pub fn new(inner: Arc<dyn PostStore>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PostStore for RecordingStore {
    async fn create(&self, user_id: i64, post: NewPost) -> Result<Post, DatabaseError> {
        self.record();
        self.inner.create(user_id, post).await
    }

    async fn list_published(&self, offset: i64, limit: i64) -> Result<Vec<PostSummary>, DatabaseError> {
        self.record();
        self.inner.list_published(offset, limit).await
    }

    async fn count_published(&self) -> Result<i64, DatabaseError> {
        self.record();
        self.inner.count_published().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, DatabaseError> {
        self.record();
        self.inner.find_by_id(id).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.inner.health_check().await
    }
}

/// A store whose backend is unreachable
pub struct FailingStore;

impl FailingStore {
    fn error() -> DatabaseError {
        DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl PostStore for FailingStore {
    async fn create(&self, _user_id: i64, _post: NewPost) -> Result<Post, DatabaseError> {
        Err(Self::error())
    }

    async fn list_published(&self, _offset: i64, _limit: i64) -> Result<Vec<PostSummary>, DatabaseError> {
        Err(Self::error())
    }

    async fn count_published(&self) -> Result<i64, DatabaseError> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Post>, DatabaseError> {
        Err(Self::error())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Err(Self::error())
    }
}
