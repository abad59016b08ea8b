//! Access guard
//! Runs before every handler: public routes pass through, everything else
//! needs a valid bearer token whose claims become the request's `Identity`.

use crate::{
    auth::jwt::{Claims, TokenCodec},
    error::AppError,
    models::user::Role,
};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use std::{convert::Infallible, sync::Arc};

/// Per-request principal, derived from a valid token and never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.sub,
            role: claims.role,
        }
    }
}

// Handlers take `Identity` as an argument; a missing identity rejects with 401.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}

// `Option<Identity>` on public routes: present only when a valid token was sent.
impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned())
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(AppError::Unauthenticated)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard,
}

/// One allow-list entry: `[METHOD ]/path`, where `*` matches a single segment
/// and a trailing `/**` matches the prefix itself and anything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    method: Option<Method>,
    segments: Vec<Segment>,
    any_suffix: bool,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let pattern = pattern.trim();
        let (method, path) = match pattern.split_once(char::is_whitespace) {
            Some((method, path)) => {
                let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                    .map_err(|_| format!("Invalid method in route pattern: {}", pattern))?;
                (Some(method), path.trim())
            }
            None => (None, pattern),
        };

        if !path.starts_with('/') {
            return Err(format!("Route pattern must start with '/': {}", pattern));
        }

        let (path, any_suffix) = match path.strip_suffix("/**") {
            Some(prefix) => (prefix, true),
            None => (path, false),
        };

        let mut segments = Vec::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match segment {
                "*" => segments.push(Segment::Wildcard),
                s if s.contains('*') => {
                    return Err(format!("Unsupported wildcard in route pattern: {}", pattern))
                }
                s => segments.push(Segment::Literal(s.to_string())),
            }
        }

        Ok(Self {
            method,
            segments,
            any_suffix,
        })
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if self.method.as_ref().is_some_and(|m| m != method) {
            return false;
        }

        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let length_ok = if self.any_suffix {
            parts.len() >= self.segments.len()
        } else {
            parts.len() == self.segments.len()
        };

        length_ok
            && self.segments.iter().zip(&parts).all(|(segment, part)| match segment {
                Segment::Wildcard => true,
                Segment::Literal(lit) => lit == part,
            })
    }
}

/// Decides, per request, whether a caller may proceed and as whom
pub struct AccessGuard {
    codec: Arc<TokenCodec>,
    public_routes: Vec<RoutePattern>,
}

impl AccessGuard {
    pub fn new(codec: Arc<TokenCodec>, public_routes: Vec<RoutePattern>) -> Self {
        Self {
            codec,
            public_routes,
        }
    }

    pub fn from_patterns(codec: Arc<TokenCodec>, patterns: &[String]) -> Result<Self, AppError> {
        let public_routes = patterns
            .iter()
            .map(|p| RoutePattern::parse(p))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::Config)?;

        Ok(Self::new(codec, public_routes))
    }

    pub fn is_public(&self, method: &Method, path: &str) -> bool {
        self.public_routes.iter().any(|p| p.matches(method, path))
    }

    /// `Ok(None)` means an anonymous caller on a public route.
    /// Public routes still pick up a valid token if one is presented.
    pub fn identify(
        &self,
        method: &Method,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Option<Identity>, AppError> {
        if self.is_public(method, path) {
            let identity = extract_token(headers)
                .ok()
                .and_then(|token| self.codec.parse(&token).ok())
                .map(Identity::from);
            return Ok(identity);
        }

        let token = extract_token(headers)?;
        let claims = self.codec.parse(&token)?;

        Ok(Some(Identity::from(claims)))
    }
}

/// Middleware wrapping the whole router
pub async fn access_guard_middleware(
    State(guard): State<Arc<AccessGuard>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = guard.identify(req.method(), req.uri().path(), req.headers())?;

    if let Some(identity) = identity {
        tracing::debug!(
            user_id = identity.user_id,
            role = %identity.role,
            "Request authenticated"
        );
        req.extensions_mut().insert(identity);
    }

    Ok(next.run(req).await)
}
