//! Authorization policy
//! Pure role/ownership decisions over an authenticated `Identity`.

use crate::{auth::middleware::Identity, error::AppError, models::post::Post, models::user::Role};

pub fn can_create_post(identity: &Identity) -> bool {
    matches!(identity.role, Role::Admin | Role::Ngo)
}

/// Author recorded on a new post. NGOs always post as themselves; admins
/// may post on behalf of another account.
pub fn post_author(identity: &Identity, requested: Option<i64>) -> i64 {
    match (identity.role, requested) {
        (Role::Admin, Some(author_id)) => author_id,
        _ => identity.user_id,
    }
}

/// Admins may modify any post; everyone else only their own.
pub fn can_modify_post(identity: &Identity, post: &Post) -> bool {
    identity.role == Role::Admin || identity.user_id == post.author_id
}

pub fn can_approve_post(identity: &Identity) -> bool {
    identity.role == Role::Admin
}

pub fn can_view_pending_posts(identity: &Identity) -> bool {
    identity.role == Role::Admin
}

/// Unapproved posts are visible to admins and their author only.
/// `viewer` is `None` for anonymous requests.
pub fn can_view_post(viewer: Option<&Identity>, post: &Post) -> bool {
    post.approved || can_view_unapproved_by(viewer, post.author_id)
}

/// Whether listings of `author_id`'s posts may include unapproved ones
pub fn can_view_unapproved_by(viewer: Option<&Identity>, author_id: i64) -> bool {
    viewer.is_some_and(|who| who.role == Role::Admin || who.user_id == author_id)
}

/// Whether a title search may include unapproved posts
pub fn can_search_unapproved(viewer: Option<&Identity>) -> bool {
    viewer.is_some_and(can_view_pending_posts)
}

/// Turn a denied decision into `Forbidden`
pub fn require(allowed: bool, identity: &Identity, action: &str) -> Result<(), AppError> {
    if allowed {
        return Ok(());
    }

    tracing::warn!(
        user_id = identity.user_id,
        role = %identity.role,
        action = %action,
        "Permission denied"
    );
    Err(AppError::Forbidden)
}
