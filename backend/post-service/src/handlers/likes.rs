/// Like handlers
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/posts/like/{id}",
    tag = "likes",
    params(("id" = Uuid, Path, description = "Post ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated post", body = crate::models::Post),
        (status = 400, description = "Already liked", body = crate::error::ErrorResponse),
        (status = 404, description = "No post with that ID", body = crate::error::ErrorResponse)
    )
)]
pub async fn like_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.like_post(post_id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(post))
}

#[utoipa::path(
    post,
    path = "/api/posts/unlike/{id}",
    tag = "likes",
    params(("id" = Uuid, Path, description = "Post ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated post", body = crate::models::Post),
        (status = 400, description = "Not liked yet", body = crate::error::ErrorResponse),
        (status = 404, description = "No post with that ID", body = crate::error::ErrorResponse)
    )
)]
pub async fn unlike_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.unlike_post(post_id.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(post))
}
