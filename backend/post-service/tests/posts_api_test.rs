//! HTTP tests for the `/api/posts` routes
//!
//! Exercises the full handler -> service -> aggregate -> store path against
//! the in-memory store.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::{bearer, test_state};
use post_service::handlers;
use serde_json::{json, Value};
use uuid::Uuid;

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.service.clone())
                .app_data($state.identity.clone())
                .configure(handlers::configure),
        )
        .await
    };
}

macro_rules! create_post {
    ($app:expr, $user:expr, $text:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer($user))
            .set_json(json!({ "text": $text, "name": "Tester" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

#[actix_web::test]
async fn test_route_reports_posts_works() {
    let state = test_state();
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/posts/test").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({ "msg": "Posts works" }));
}

#[actix_web::test]
async fn worked_example_like_unlike_flow() {
    let state = test_state();
    let app = app!(state);
    let u1 = Uuid::new_v4();
    let u2 = Uuid::new_v4();

    let created = create_post!(app, u1, "hello there everyone");
    assert_eq!(created["user"], u1.to_string());
    assert_eq!(created["likes"], json!([]));
    assert_eq!(created["comments"], json!([]));
    let post_id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post_id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);

    let like = || {
        test::TestRequest::post()
            .uri(&format!("/api/posts/like/{}", post_id))
            .insert_header(bearer(u2))
            .to_request()
    };
    let unlike = || {
        test::TestRequest::post()
            .uri(&format!("/api/posts/unlike/{}", post_id))
            .insert_header(bearer(u2))
            .to_request()
    };

    let resp = test::call_service(&app, like()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let liked: Value = test::read_body_json(resp).await;
    assert_eq!(liked["likes"], json!([{ "user": u2.to_string() }]));

    let resp = test::call_service(&app, like()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "ALREADY_LIKED");

    let resp = test::call_service(&app, unlike()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let unliked: Value = test::read_body_json(resp).await;
    assert_eq!(unliked["likes"], json!([]));

    let resp = test::call_service(&app, unlike()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "NOT_LIKED");
}

#[actix_web::test]
async fn create_ignores_user_field_in_body() {
    let state = test_state();
    let app = app!(state);
    let caller = Uuid::new_v4();
    let impostor = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(caller))
        .set_json(json!({ "text": "hello there everyone", "user": impostor }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["user"], caller.to_string());
}

#[actix_web::test]
async fn create_requires_authentication() {
    let state = test_state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({ "text": "hello there everyone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "UNAUTHORIZED");

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(("Authorization", "Bearer not-a-user"))
        .set_json(json!({ "text": "hello there everyone" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Nothing was stored
    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_validates_text() {
    let state = test_state();
    let app = app!(state);
    let user = Uuid::new_v4();

    for body in [json!({}), json!({ "text": "short" }), json!({ "text": "x".repeat(301) })] {
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(user))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "VALIDATION_ERROR");
        assert!(err["details"]["text"].is_array());
    }

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header(bearer(user))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn list_is_newest_first_and_empty_is_not_found() {
    let state = test_state();
    let app = app!(state);
    let user = Uuid::new_v4();

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "NO_POSTS_FOUND");

    let first = create_post!(app, user, "the first post ever");
    let second = create_post!(app, user, "the second post here");
    let third = create_post!(app, user, "the third post today");

    for uri in ["/api/posts", "/api/posts/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<&Value> = body.as_array().unwrap().iter().map(|p| &p["id"]).collect();
        assert_eq!(ids, vec![&third["id"], &second["id"], &first["id"]]);
    }
}

#[actix_web::test]
async fn get_unknown_or_malformed_id_is_not_found() {
    let state = test_state();
    let app = app!(state);

    for uri in [
        format!("/api/posts/{}", Uuid::new_v4()),
        "/api/posts/not-a-uuid".to_string(),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "POST_NOT_FOUND");
    }
}

#[actix_web::test]
async fn only_owner_can_delete() {
    let state = test_state();
    let app = app!(state);
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();

    let created = create_post!(app, owner, "hello there everyone");
    let uri = format!("/api/posts/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(other))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "NOT_POST_OWNER");

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(owner))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "post": "post deleted" }));

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(owner))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn like_and_unlike_unknown_post_are_not_found() {
    let state = test_state();
    let app = app!(state);
    let user = Uuid::new_v4();
    let missing = Uuid::new_v4();

    for uri in [
        format!("/api/posts/like/{}", missing),
        format!("/api/posts/unlike/{}", missing),
        "/api/posts/unlike/not-a-uuid".to_string(),
    ] {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(bearer(user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "POST_NOT_FOUND", "{uri}");
    }
}

#[actix_web::test]
async fn comments_are_newest_first_and_removable() {
    let state = test_state();
    let app = app!(state);
    let owner = Uuid::new_v4();
    let commenter = Uuid::new_v4();

    let created = create_post!(app, owner, "hello there everyone");
    let post_id = created["id"].as_str().unwrap().to_string();

    let mut post = Value::Null;
    for text in ["first comment here", "second comment here", "third comment here"] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/posts/comment/{}", post_id))
            .insert_header(bearer(commenter))
            .set_json(json!({ "text": text, "name": "Commenter" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        post = test::read_body_json(resp).await;
    }

    let comments = post["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 3);
    assert_eq!(comments[0]["text"], "third comment here");
    assert_eq!(comments[0]["user"], commenter.to_string());
    assert_eq!(comments[2]["text"], "first comment here");

    let target = comments[1]["id"].as_str().unwrap().to_string();
    let remove = |comment_id: &str| {
        test::TestRequest::delete()
            .uri(&format!("/api/posts/comment/{}/{}", post_id, comment_id))
            .insert_header(bearer(commenter))
            .to_request()
    };

    let resp = test::call_service(&app, remove(&target)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let post: Value = test::read_body_json(resp).await;
    let texts: Vec<&str> = post["comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["third comment here", "first comment here"]);

    for missing in [target.as_str(), "not-a-uuid"] {
        let resp = test::call_service(&app, remove(missing)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "COMMENT_NOT_FOUND");
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{}", post_id))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["comments"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn comment_requires_valid_text() {
    let state = test_state();
    let app = app!(state);
    let user = Uuid::new_v4();

    let created = create_post!(app, user, "hello there everyone");
    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/comment/{}", created["id"].as_str().unwrap()))
        .insert_header(bearer(user))
        .set_json(json!({ "text": "tiny" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn comment_routes_on_missing_post_are_not_found() {
    let state = test_state();
    let app = app!(state);
    let user = Uuid::new_v4();
    let missing = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/comment/{}", missing))
        .insert_header(bearer(user))
        .set_json(json!({ "text": "a comment to nowhere" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    for comment_id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let req = test::TestRequest::delete()
            .uri(&format!("/api/posts/comment/{}/{}", missing, comment_id))
            .insert_header(bearer(user))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: Value = test::read_body_json(resp).await;
        assert_eq!(err["error"], "POST_NOT_FOUND");
    }

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/comment/not-a-uuid/{}", Uuid::new_v4()))
        .insert_header(bearer(user))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "POST_NOT_FOUND");
}

#[actix_web::test]
async fn health_probes_report_ready() {
    let state = test_state();
    let app = app!(state);

    for uri in ["/api/v1/health", "/api/v1/health/live", "/api/v1/health/ready"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
    }

    let req = test::TestRequest::get().uri("/api/v1/health/ready").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["store"]["status"], "healthy");
}
