/// Post handlers - HTTP endpoints for post operations
use super::PostRequest;
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct TestResponse {
    pub msg: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub post: String,
}

/// Connectivity check for the posts routes
#[utoipa::path(
    get,
    path = "/api/posts/test",
    tag = "posts",
    responses((status = 200, description = "Routes are mounted", body = TestResponse))
)]
pub async fn test_route() -> HttpResponse {
    HttpResponse::Ok().json(TestResponse {
        msg: "Posts works".to_string(),
    })
}

/// List all posts, newest first
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    responses(
        (status = 200, description = "Posts by descending date", body = [crate::models::Post]),
        (status = 404, description = "No posts exist", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_posts(service: web::Data<PostService>) -> Result<HttpResponse> {
    let posts = service.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Get a post by ID
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = crate::models::Post),
        (status = 404, description = "No post with that ID", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_post(
    service: web::Data<PostService>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = service.get_post(post_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Create a post owned by the caller
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    request_body = PostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post created", body = crate::models::Post),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    let draft = req.into_inner().into_draft()?;
    let post = service.create_post(user_id.0, draft).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post (owner only)
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Post deleted", body = DeleteResponse),
        (status = 401, description = "Caller does not own the post", body = crate::error::ErrorResponse),
        (status = 404, description = "No post with that ID", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    service.delete_post(post_id.into_inner(), user_id.0).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        post: "post deleted".to_string(),
    }))
}
