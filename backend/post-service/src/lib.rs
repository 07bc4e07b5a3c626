/// Post Service Library
///
/// Social feed posts for the platform: authenticated users create short text
/// posts, everyone can read them, and users like, unlike and comment on them.
/// Only the owner may delete a post.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: The `Post` aggregate with its likes and comments
/// - `services`: Load/mutate/save orchestration with optimistic retries
/// - `db`: `PostStore` trait with PostgreSQL and in-memory implementations
/// - `middleware`: Bearer-token identity extraction, ownership checks, request metrics
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
/// - `openapi`: API documentation
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
