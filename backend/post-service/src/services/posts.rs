/// Post service - load, mutate and persist the post aggregate
use crate::db::{PostStore, StoreError};
use crate::error::{AppError, Result};
use crate::metrics::{record_operation, record_save_conflict};
use crate::middleware::check_post_deletion;
use crate::models::{Post, PostDraft, PostError};
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_MAX_SAVE_ATTEMPTS: u32 = 5;

pub struct PostService {
    store: Arc<dyn PostStore>,
    max_save_attempts: u32,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self::with_max_save_attempts(store, DEFAULT_MAX_SAVE_ATTEMPTS)
    }

    pub fn with_max_save_attempts(store: Arc<dyn PostStore>, max_save_attempts: u32) -> Self {
        Self {
            store,
            max_save_attempts: max_save_attempts.max(1),
        }
    }

    /// Create a post owned by the authenticated user
    pub async fn create_post(&self, owner: Uuid, draft: PostDraft) -> Result<Post> {
        let post = self.store.insert(Post::new(owner, draft)).await?;

        record_operation("create", "ok");
        tracing::info!(post_id = %post.id(), user_id = %owner, "post created");
        Ok(post)
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        self.store
            .get_by_id(post_id)
            .await?
            .ok_or(AppError::PostNotFound)
    }

    /// All posts, newest first. An empty store is reported as `NoPostsFound`.
    pub async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts = self.store.list_sorted_by_date_desc().await?;
        if posts.is_empty() {
            return Err(AppError::NoPostsFound);
        }
        Ok(posts)
    }

    /// Delete a post; only its owner may do so
    pub async fn delete_post(&self, post_id: Uuid, user_id: Uuid) -> Result<()> {
        let post = self
            .store
            .get_by_id(post_id)
            .await?
            .ok_or(AppError::PostNotFound)?;

        if let Err(err) = check_post_deletion(user_id, &post) {
            record_operation("delete", "rejected");
            tracing::warn!(%post_id, %user_id, "non-owner attempted to delete post");
            return Err(err);
        }

        // Owner-conditional delete; false means someone else removed it first
        if !self.store.delete_by_id_for_owner(post_id, user_id).await? {
            record_operation("delete", "not_found");
            return Err(AppError::PostNotFound);
        }

        record_operation("delete", "ok");
        tracing::info!(%post_id, %user_id, "post deleted");
        Ok(())
    }

    pub async fn like_post(&self, post_id: Uuid, user_id: Uuid) -> Result<Post> {
        self.mutate("like", post_id, |post| post.add_like(user_id))
            .await
    }

    pub async fn unlike_post(&self, post_id: Uuid, user_id: Uuid) -> Result<Post> {
        self.mutate("unlike", post_id, |post| post.remove_like(user_id))
            .await
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post> {
        self.mutate("comment", post_id, |post| {
            post.add_comment(user_id, draft.clone());
            Ok(())
        })
        .await
    }

    /// Remove a comment by id. Any authenticated user may do this; the caller
    /// is only recorded in the log.
    pub async fn remove_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
    ) -> Result<Post> {
        let post = self
            .mutate("uncomment", post_id, |post| {
                post.remove_comment(comment_id).map(|_| ())
            })
            .await?;

        tracing::info!(%post_id, %comment_id, %user_id, "comment removed");
        Ok(post)
    }

    /// Round-trip to the store for readiness checks
    pub async fn check_store(&self) -> Result<()> {
        self.store.ping().await?;
        Ok(())
    }

    /// Load the post, apply `apply`, and save it against the loaded version.
    ///
    /// A version conflict re-runs the whole cycle on a fresh snapshot, so the
    /// aggregate rules are always checked against the state being replaced.
    async fn mutate<F>(&self, operation: &'static str, post_id: Uuid, apply: F) -> Result<Post>
    where
        F: Fn(&mut Post) -> std::result::Result<(), PostError> + Send + Sync,
    {
        for attempt in 1..=self.max_save_attempts {
            let mut post = match self.store.get_by_id(post_id).await? {
                Some(post) => post,
                None => {
                    record_operation(operation, "not_found");
                    return Err(AppError::PostNotFound);
                }
            };

            if let Err(err) = apply(&mut post) {
                record_operation(operation, "rejected");
                tracing::warn!(%post_id, operation, error = %err, "post mutation rejected");
                return Err(err.into());
            }

            match self.store.save(post).await {
                Ok(saved) => {
                    record_operation(operation, "ok");
                    tracing::info!(
                        %post_id,
                        operation,
                        version = saved.version(),
                        "post updated"
                    );
                    return Ok(saved);
                }
                Err(StoreError::VersionConflict { expected, .. }) => {
                    record_save_conflict(operation);
                    tracing::warn!(
                        %post_id,
                        operation,
                        attempt,
                        expected_version = expected,
                        "concurrent post update, reloading"
                    );
                }
                Err(StoreError::NotFound(_)) => {
                    record_operation(operation, "not_found");
                    return Err(AppError::PostNotFound);
                }
                Err(err) => {
                    record_operation(operation, "error");
                    return Err(err.into());
                }
            }
        }

        record_operation(operation, "contended");
        tracing::error!(
            %post_id,
            operation,
            attempts = self.max_save_attempts,
            "giving up on contended post"
        );
        Err(AppError::ConcurrentModification)
    }
}
