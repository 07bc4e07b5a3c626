/// Ownership checks for destructive post operations
///
/// Only deletion is owner-restricted. Likes, unlikes and comment add/remove
/// are open to any authenticated user.
use crate::error::AppError;
use crate::models::Post;
use uuid::Uuid;

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Check if a user owns a post
pub fn check_post_ownership(user_id: Uuid, post: &Post) -> PermissionResult {
    if post.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(AppError::NotPostOwner)
    }
}

/// Only the owner can delete their own posts
pub fn check_post_deletion(user_id: Uuid, post: &Post) -> PermissionResult {
    check_post_ownership(user_id, post)
}
