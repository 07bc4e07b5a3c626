/// HTTP handlers for post-service
///
/// - Posts: test route, create, list, get, owner-only delete
/// - Likes: like / unlike
/// - Comments: add / remove
/// - Health: liveness, readiness and summary probes
///
/// Handlers only extract, validate and translate; every rule lives in
/// `PostService` and the `Post` aggregate.
pub mod comments;
pub mod health;
pub mod likes;
pub mod posts;

pub use comments::{add_comment, remove_comment};
pub use likes::{like_post, unlike_post};
pub use posts::{create_post, delete_post, get_post, list_posts, test_route};

use crate::error::AppError;
use crate::models::PostDraft;
use actix_web::web;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

pub const POST_TEXT_MIN_CHARS: usize = 10;
pub const POST_TEXT_MAX_CHARS: usize = 300;

/// Body for creating a post or a comment.
///
/// The author is always the authenticated caller; a `user` field in the
/// body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_post_text"))]
    pub text: String,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "Avatar must be at most 500 characters"))]
    pub avatar: Option<String>,
}

impl PostRequest {
    /// Validate and convert into a draft with trimmed text and blank
    /// optional fields dropped.
    pub fn into_draft(self) -> Result<PostDraft, AppError> {
        self.validate()?;

        Ok(PostDraft {
            text: self.text.trim().to_string(),
            name: non_blank(self.name),
            avatar: non_blank(self.avatar),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn validate_post_text(text: &str) -> Result<(), ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("Text field is required")));
    }

    let chars = text.chars().count();
    if !(POST_TEXT_MIN_CHARS..=POST_TEXT_MAX_CHARS).contains(&chars) {
        return Err(ValidationError::new("length")
            .with_message(Cow::Borrowed("Post must be between 10 and 300 characters")));
    }

    Ok(())
}

/// Malformed JSON bodies become structured 400s instead of actix's plain text
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "rejected request body");
            AppError::invalid_field("body", err.to_string()).into()
        })
}

/// A path id that is not a UUID cannot name an existing post
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| AppError::PostNotFound.into())
}

/// Register the `/api/posts` scope and the health probes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/health", web::get().to(health::health_summary))
        .route("/api/v1/health/live", web::get().to(health::liveness_check))
        .route("/api/v1/health/ready", web::get().to(health::readiness_check))
        .service(
            web::scope("/api/posts")
                .app_data(json_config())
                .app_data(path_config())
                // before "/{id}"
                .route("/test", web::get().to(posts::test_route))
                .service(
                    web::resource(["", "/"])
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .route("/like/{id}", web::post().to(likes::like_post))
                .route("/unlike/{id}", web::post().to(likes::unlike_post))
                .route("/comment/{id}", web::post().to(comments::add_comment))
                .route(
                    "/comment/{id}/{comment_id}",
                    web::delete().to(comments::remove_comment),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::delete().to(posts::delete_post)),
                ),
        );
}
