/// Comment handlers
use super::PostRequest;
use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

/// Add a comment; it becomes the head of the post's comment list
#[utoipa::path(
    post,
    path = "/api/posts/comment/{id}",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = PostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated post", body = crate::models::Post),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "No post with that ID", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    let draft = req.into_inner().into_draft()?;
    let post = service
        .add_comment(post_id.into_inner(), user_id.0, draft)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Remove a comment by ID
#[utoipa::path(
    delete,
    path = "/api/posts/comment/{id}/{comment_id}",
    tag = "comments",
    params(
        ("id" = Uuid, Path, description = "Post ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated post", body = crate::models::Post),
        (status = 404, description = "Post or comment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn remove_comment(
    service: web::Data<PostService>,
    user_id: UserId,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment_id = match Uuid::parse_str(&comment_id) {
        Ok(id) => id,
        Err(_) => {
            // A missing post still wins over a comment id that cannot match
            service.get_post(post_id).await?;
            return Err(AppError::CommentNotFound);
        }
    };

    let post = service
        .remove_comment(post_id, comment_id, user_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(post))
}
