//! Access probes under `/api/test`

use crate::auth::middleware::Identity;

pub async fn all_access() -> &'static str {
    "Public Content."
}

/// Any authenticated role
pub async fn user_access(identity: Identity) -> String {
    format!("{} has access to {}", identity.username, identity.user_id)
}
