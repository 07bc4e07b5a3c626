/// HTTP middleware utilities for post-service
///
/// Provides bearer-token authentication (as an extractor, so public and
/// private routes can share a scope) and request metrics.
pub mod permissions;

pub use permissions::*;

use crate::error::AppError;
use crate::metrics::HTTP_REQUEST_DURATION_SECONDS;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

// =====================================================================
// Identity
// =====================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid RSA public key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Unexpected token type '{0}'")]
    WrongTokenType(String),

    #[error("Token subject is not a valid user ID")]
    InvalidSubject,

    #[error("Authentication is not configured")]
    NotConfigured,
}

/// Turns a bearer credential into an authenticated user reference.
pub trait IdentityProvider: Send + Sync {
    fn authenticate(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Access-token claims issued by the identity service
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    /// "access" or "refresh"; absent on tokens from older issuers
    #[serde(default)]
    pub token_type: Option<String>,
}

/// RS256-only JWT validation
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn from_rsa_pem(public_key_pem: &str) -> Result<Self, AuthError> {
        let decoding_key =
            DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(AuthError::InvalidKey)?;

        Ok(Self {
            decoding_key,
            validation: Validation::new(Algorithm::RS256),
        })
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn authenticate(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        if let Some(token_type) = data.claims.token_type.as_deref() {
            if token_type != "access" {
                return Err(AuthError::WrongTokenType(token_type.to_string()));
            }
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidSubject)
    }
}

/// Fallback when no public key is configured: every private route answers 401.
pub struct RejectingIdentityProvider;

impl IdentityProvider for RejectingIdentityProvider {
    fn authenticate(&self, _token: &str) -> Result<Uuid, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

/// Authenticated user, extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

impl FromRequest for UserId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}

fn authenticate_request(req: &HttpRequest) -> Result<UserId, AppError> {
    let provider = req
        .app_data::<web::Data<dyn IdentityProvider>>()
        .ok_or_else(|| AppError::Internal("identity provider not registered".to_string()))?;

    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".to_string()))?;

    provider.authenticate(token).map(UserId).map_err(|err| {
        tracing::debug!(error = %err, "bearer token rejected");
        AppError::Unauthorized(err.to_string())
    })
}

// =====================================================================
// Metrics middleware
// =====================================================================

pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let method = req.method().to_string();
        // Route pattern keeps label cardinality bounded
        let route = req
            .match_pattern()
            .unwrap_or_else(|| "unmatched".to_string());
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed();
            let status = match &res {
                Ok(resp) => resp.status().as_u16().to_string(),
                Err(err) => err.as_response_error().status_code().as_u16().to_string(),
            };

            HTTP_REQUEST_DURATION_SECONDS
                .with_label_values(&[&method, &route, &status])
                .observe(elapsed.as_secs_f64());
            tracing::debug!(%method, %route, %status, elapsed_ms = elapsed.as_millis() as u64, "request completed");
            res
        })
    }
}
