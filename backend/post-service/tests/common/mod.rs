//! Shared fixtures for post-service HTTP tests
//!
//! Runs the real handlers against the in-memory store. Bearer tokens are
//! plain user UUIDs, accepted by a static identity provider, so tests can
//! act as any user without minting JWTs.

#![allow(dead_code)]

use actix_web::web;
use post_service::db::InMemoryPostStore;
use post_service::middleware::{AuthError, IdentityProvider};
use post_service::services::PostService;
use std::sync::Arc;
use uuid::Uuid;

/// Accepts any token that parses as a UUID and treats it as the user id
pub struct StaticIdentityProvider;

impl IdentityProvider for StaticIdentityProvider {
    fn authenticate(&self, token: &str) -> Result<Uuid, AuthError> {
        Uuid::parse_str(token).map_err(|_| AuthError::InvalidSubject)
    }
}

pub struct TestState {
    pub service: web::Data<PostService>,
    pub identity: web::Data<dyn IdentityProvider>,
}

pub fn test_state() -> TestState {
    let store = Arc::new(InMemoryPostStore::new());
    let identity: Arc<dyn IdentityProvider> = Arc::new(StaticIdentityProvider);

    TestState {
        service: web::Data::new(PostService::new(store)),
        identity: web::Data::from(identity),
    }
}

pub fn bearer(user: Uuid) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", user))
}
