//! Unified error model
//! Error taxonomy and the JSON error body returned to clients

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{auth::jwt::TokenError, middleware::current_request_id};

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown username or wrong password; the two are indistinguishable
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,

    #[error("Username is already taken")]
    DuplicateUsername,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::DuplicateUsername | AppError::BadRequest(_) | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message, free of internal detail
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid username or password".to_string(),
            AppError::Unauthenticated => "Authentication required".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::DuplicateUsername => "Error: Username is already taken!".to_string(),
            AppError::NotFound(what) => format!("Resource not found: {}", what),
            AppError::BadRequest(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::PayloadTooLarge => "Request body too large".to_string(),
            AppError::Database(_) => "Database error occurred".to_string(),
            AppError::Config(_) => "Configuration error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(what.to_string())
    }

    pub fn internal_error(msg: &str) -> Self {
        AppError::Internal(msg.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let request_id = current_request_id().unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code(),
                message: self.user_message(),
                request_id,
            },
        };

        if status.is_server_error() {
            tracing::error!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Application error"
            );
        } else {
            tracing::debug!(
                code = self.code(),
                message = %self,
                request_id = %error_response.error.request_id,
                "Request rejected"
            );
        }

        (status, Json(error_response)).into_response()
    }
}

impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// Parse failures collapse to `Unauthenticated`; the reason is only logged.
impl From<TokenError> for AppError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encoding(msg) => AppError::Internal(format!("Token encoding failed: {}", msg)),
            other => {
                tracing::debug!(reason = %other, "Bearer token rejected");
                AppError::Unauthenticated
            }
        }
    }
}

/// Malformed bodies are 400 rather than axum's 422; oversized ones stay 413.
impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::BadRequest(e.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::InvalidCredentials.code(), 401);
        assert_eq!(AppError::Unauthenticated.code(), 401);
        assert_eq!(AppError::Forbidden.code(), 403);
        assert_eq!(AppError::not_found("post").code(), 404);
        assert_eq!(AppError::DuplicateUsername.code(), 400);
        assert_eq!(AppError::BadRequest("test".to_string()).code(), 400);
        assert_eq!(AppError::PayloadTooLarge.code(), 413);
        assert_eq!(AppError::internal_error("boom").code(), 500);
    }

    #[test]
    fn test_user_message_no_sensitive_info() {
        let error = AppError::Database(sqlx::Error::RowNotFound);
        let message = error.user_message();
        assert_eq!(message, "Database error occurred");
        assert!(!message.contains("sqlx"));

        let error = AppError::internal_error("signing key misconfigured");
        assert!(!error.user_message().contains("signing key"));
    }

    #[test]
    fn test_token_errors_collapse_to_unauthenticated() {
        for e in [
            TokenError::Malformed,
            TokenError::InvalidSignature,
            TokenError::Expired,
            TokenError::UnsupportedFormat,
        ] {
            assert!(matches!(AppError::from(e), AppError::Unauthenticated));
        }

        let encoding = AppError::from(TokenError::Encoding("bad key".to_string()));
        assert_eq!(encoding.code(), 500);
    }
}
