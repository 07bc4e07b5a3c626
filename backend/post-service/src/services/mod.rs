/// Business logic layer for post-service
///
/// - Post service: creation, retrieval, deletion, likes and comments,
///   with optimistic save retries around every aggregate mutation
pub mod posts;

pub use posts::{PostService, DEFAULT_MAX_SAVE_ATTEMPTS};
