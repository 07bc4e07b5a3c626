/// OpenAPI documentation for Post Service
use crate::error::ErrorResponse;
use crate::handlers::posts::{DeleteResponse, TestResponse};
use crate::handlers::PostRequest;
use crate::models::{Comment, Like, Post};
use actix_web::{web, HttpResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Post Service API",
        version = "1.0.0",
        description = "Social feed posts: create, list, fetch and delete posts, like and unlike them, add and remove comments. Mutations are saved with optimistic versioning so concurrent likes and comments are never lost."
    ),
    paths(
        crate::handlers::posts::test_route,
        crate::handlers::posts::list_posts,
        crate::handlers::posts::get_post,
        crate::handlers::posts::create_post,
        crate::handlers::posts::delete_post,
        crate::handlers::likes::like_post,
        crate::handlers::likes::unlike_post,
        crate::handlers::comments::add_comment,
        crate::handlers::comments::remove_comment,
    ),
    components(schemas(
        Post,
        Like,
        Comment,
        PostRequest,
        TestResponse,
        DeleteResponse,
        ErrorResponse
    )),
    tags(
        (name = "posts", description = "Post creation, retrieval and deletion"),
        (name = "likes", description = "Liking and unliking posts"),
        (name = "comments", description = "Comment management on posts"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("RS256 access token from the identity service"))
                        .build(),
                ),
            )
        }
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}

pub async fn openapi_json(doc: web::Data<utoipa::openapi::OpenApi>) -> actix_web::Result<HttpResponse> {
    let body = serde_json::to_string(&*doc).map_err(|e| {
        tracing::error!("OpenAPI serialization failed: {}", e);
        actix_web::error::ErrorInternalServerError("OpenAPI serialization error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}
