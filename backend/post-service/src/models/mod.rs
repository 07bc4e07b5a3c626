/// Data models for post-service
///
/// A `Post` is the aggregate root: it exclusively owns its `likes` and
/// `comments`, and every change to those collections goes through the
/// mutation methods below so the invariants are checked before anything
/// reaches the store.
///
/// - Likes: at most one per user, newest first
/// - Comments: flat list, newest first
/// - Owner, text, name, avatar and date never change after creation
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Rule violations raised by the aggregate's mutation methods.
///
/// A failed mutation always leaves the post untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostError {
    #[error("User already liked this post")]
    AlreadyLiked,

    #[error("You have not yet liked this post")]
    NotLiked,

    #[error("Comment {0} does not exist")]
    CommentNotFound(Uuid),
}

/// Fields supplied by the client when creating a post or a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

/// Only built through `Post::new` or `Post::restore`; serialized, never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Post {
    id: Uuid,
    #[serde(rename = "user")]
    owner: Uuid,
    text: String,
    name: Option<String>,
    avatar: Option<String>,
    likes: Vec<Like>,
    comments: Vec<Comment>,
    date: DateTime<Utc>,
    /// Store-managed revision, bumped on every successful save.
    #[serde(skip)]
    version: i64,
}

impl Post {
    /// Create a new post owned by the authenticated `owner`.
    pub fn new(owner: Uuid, draft: PostDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            text: draft.text,
            name: draft.name,
            avatar: draft.avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
            version: 0,
        }
    }

    /// Rebuild a post from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: Uuid,
        owner: Uuid,
        text: String,
        name: Option<String>,
        avatar: Option<String>,
        likes: Vec<Like>,
        comments: Vec<Comment>,
        date: DateTime<Utc>,
        version: i64,
    ) -> Self {
        Self {
            id,
            owner,
            text,
            name,
            avatar,
            likes,
            comments,
            date,
            version,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner(&self) -> Uuid {
        self.owner
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn likes(&self) -> &[Like] {
        &self.likes
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: i64) {
        self.version = version;
    }

    pub fn is_owned_by(&self, user: Uuid) -> bool {
        self.owner == user
    }

    pub fn is_liked_by(&self, user: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user)
    }

    /// Record a like from `user` at the head of the likes list.
    pub fn add_like(&mut self, user: Uuid) -> Result<(), PostError> {
        if self.is_liked_by(user) {
            return Err(PostError::AlreadyLiked);
        }

        self.likes.insert(0, Like { user });
        Ok(())
    }

    /// Drop `user`'s like, keeping the remaining likes in order.
    pub fn remove_like(&mut self, user: Uuid) -> Result<(), PostError> {
        let index = self
            .likes
            .iter()
            .position(|like| like.user == user)
            .ok_or(PostError::NotLiked)?;

        self.likes.remove(index);
        Ok(())
    }

    /// Prepend a new comment and return its id.
    pub fn add_comment(&mut self, user: Uuid, draft: PostDraft) -> Uuid {
        let comment = Comment {
            id: Uuid::new_v4(),
            user,
            text: draft.text,
            name: draft.name,
            avatar: draft.avatar,
            date: Utc::now(),
        };
        let id = comment.id;

        self.comments.insert(0, comment);
        id
    }

    pub fn remove_comment(&mut self, comment_id: Uuid) -> Result<Comment, PostError> {
        let index = self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
            .ok_or(PostError::CommentNotFound(comment_id))?;

        Ok(self.comments.remove(index))
    }
}
