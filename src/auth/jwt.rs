//! Bearer token codec
//! HS256-signed compact JWTs carrying username, user id and role

use crate::{
    auth::clock::{Clock, SystemClock},
    config::AppConfig,
    error::AppError,
    models::user::Role,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Minimum secret length for HS256
pub const MIN_SECRET_LEN: usize = 32;

/// Claims embedded in every bearer token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    #[serde(rename = "userId")]
    pub user_id: i64,

    pub role: Role,

    /// Issued at (seconds since epoch)
    pub iat: i64,

    /// Expiration (seconds since epoch)
    pub exp: i64,
}

/// Why a token was refused. Only ever logged; clients see `Unauthenticated`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("signature does not match")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("unsupported token algorithm or type")]
    UnsupportedFormat,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

/// Issues and parses bearer tokens with a key fixed at construction
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_secs: u64, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_SECRET_LEN
            )));
        }

        // Expiry is checked against the injected clock in `parse`, without leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
            clock,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let secret = config.security.jwt_secret.expose_secret();
        Self::new(secret.as_bytes(), config.security.token_ttl_secs, clock)
    }

    /// Issue a token valid from now until now + ttl
    pub fn issue(&self, username: &str, user_id: i64, role: Role) -> Result<String, TokenError> {
        let now = self.clock.now();
        let expiration = now + Duration::seconds(self.ttl_secs as i64);

        let claims = Claims {
            sub: username.to_string(),
            user_id,
            role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode token: {:?}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Verify structure, algorithm, signature and expiry, in that order
    pub fn parse(&self, token: &str) -> Result<Claims, TokenError> {
        inspect_header(token)?;

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        if self.clock.now().timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Check the header segment before handing the token to the verifier, so that
/// unknown algorithms (including `none`) are reported as such.
fn inspect_header(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let header = segments.next().ok_or(TokenError::Malformed)?;
    if segments.count() != 2 {
        return Err(TokenError::Malformed);
    }

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| TokenError::Malformed)?;
    let header: serde_json::Value =
        serde_json::from_slice(&raw).map_err(|_| TokenError::Malformed)?;

    let alg = header
        .get("alg")
        .and_then(|v| v.as_str())
        .ok_or(TokenError::Malformed)?;
    if alg != "HS256" {
        return Err(TokenError::UnsupportedFormat);
    }

    match header.get("typ") {
        None => Ok(()),
        Some(typ) if typ.as_str().is_some_and(|t| t.eq_ignore_ascii_case("JWT")) => Ok(()),
        Some(_) => Err(TokenError::UnsupportedFormat),
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenError::UnsupportedFormat,
        _ => TokenError::Malformed,
    }
}
