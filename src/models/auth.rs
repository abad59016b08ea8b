//! Authentication-related models

use serde::{Deserialize, Serialize};

use super::user::Role;

/// Signin request
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Signin response: the bearer token and the role it carries
#[derive(Debug, Serialize, Deserialize)]
pub struct SigninResponse {
    pub token: String,
    pub role: Role,
}

/// Plain acknowledgement body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
