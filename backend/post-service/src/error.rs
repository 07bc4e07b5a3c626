/// Error types for Post Service
///
/// Every failure surfaces at the request boundary as a JSON body with a
/// stable machine-readable `error` key and a human-readable `message`.
use crate::db::StoreError;
use crate::models::PostError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type for post-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Field name -> validation messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Destructive action attempted by someone other than the post owner
    #[error("User not authorized to delete this post")]
    NotPostOwner,

    #[error("No post found with that ID")]
    PostNotFound,

    #[error("No posts found")]
    NoPostsFound,

    #[error("Comment with this ID does not exist")]
    CommentNotFound,

    #[error("User already liked this post")]
    AlreadyLiked,

    #[error("You have not yet liked this post")]
    NotLiked,

    /// Optimistic save kept losing to concurrent writers
    #[error("Post was modified concurrently, please retry")]
    ConcurrentModification,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

impl AppError {
    /// Stable key clients can match on
    pub fn key(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotPostOwner => "NOT_POST_OWNER",
            AppError::PostNotFound => "POST_NOT_FOUND",
            AppError::NoPostsFound => "NO_POSTS_FOUND",
            AppError::CommentNotFound => "COMMENT_NOT_FOUND",
            AppError::AlreadyLiked => "ALREADY_LIKED",
            AppError::NotLiked => "NOT_LIKED",
            AppError::ConcurrentModification => "CONCURRENT_MODIFICATION",
            AppError::Store(_) => "STORE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Single-field validation failure
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::NotPostOwner => StatusCode::UNAUTHORIZED,
            AppError::PostNotFound | AppError::NoPostsFound | AppError::CommentNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::AlreadyLiked | AppError::NotLiked => StatusCode::BAD_REQUEST,
            AppError::ConcurrentModification => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = match self {
            AppError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                "Internal storage error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let details = match self {
            AppError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.key().to_string(),
            message,
            details,
        })
    }
}

impl From<PostError> for AppError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::AlreadyLiked => AppError::AlreadyLiked,
            PostError::NotLiked => AppError::NotLiked,
            PostError::CommentNotFound(_) => AppError::CommentNotFound,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        AppError::Validation(fields)
    }
}
