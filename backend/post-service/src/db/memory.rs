use super::{PostStore, StoreError, StoreResult};
use crate::models::Post;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store with the same version semantics as `PgPostStore`.
///
/// Used for local development (`STORE_BACKEND=memory`) and tests.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn insert(&self, post: Post) -> StoreResult<Post> {
        self.posts.write().await.insert(post.id(), post.clone());
        Ok(post)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn list_sorted_by_date_desc(&self) -> StoreResult<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| b.id().cmp(&a.id())));
        Ok(posts)
    }

    async fn delete_by_id_for_owner(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut posts = self.posts.write().await;
        match posts.get(&id) {
            Some(post) if post.is_owned_by(owner) => {
                posts.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn save(&self, mut post: Post) -> StoreResult<Post> {
        let mut posts = self.posts.write().await;
        let stored = posts
            .get_mut(&post.id())
            .ok_or(StoreError::NotFound(post.id()))?;

        if stored.version() != post.version() {
            return Err(StoreError::VersionConflict {
                post_id: post.id(),
                expected: post.version(),
            });
        }

        post.set_version(post.version() + 1);
        *stored = post.clone();
        Ok(post)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
