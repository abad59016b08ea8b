//! Application state and request tracking

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{AccessGuard, Clock, PasswordHasher, SystemClock, TokenCodec},
    config::AppConfig,
    error::AppError,
    repository::Storage,
    services::{AuthService, PaymentService, PostService},
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Storage,
    pub codec: Arc<TokenCodec>,
    pub guard: Arc<AccessGuard>,
    pub auth_service: Arc<AuthService>,
    pub post_service: Arc<PostService>,
    pub payment_service: Arc<PaymentService>,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Storage) -> Result<Self, AppError> {
        Self::with_clock(config, storage, Arc::new(SystemClock), PasswordHasher::new())
    }

    /// Build the object graph with an explicit clock and hasher
    pub fn with_clock(
        config: AppConfig,
        storage: Storage,
        clock: Arc<dyn Clock>,
        hasher: PasswordHasher,
    ) -> Result<Self, AppError> {
        let config = Arc::new(config);

        let codec = Arc::new(TokenCodec::with_clock(&config, clock)?);
        let guard = Arc::new(AccessGuard::from_patterns(
            codec.clone(),
            &config.security.public_paths,
        )?);

        let auth_service = Arc::new(AuthService::new(
            storage.accounts(),
            codec.clone(),
            hasher,
            config.clone(),
        )?);
        let post_service = Arc::new(PostService::new(storage.posts()));
        let payment_service = Arc::new(PaymentService::new());

        Ok(Self {
            config,
            storage,
            codec,
            guard,
            auth_service,
            post_service,
            payment_service,
        })
    }
}

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Request id of the request being served, if any.
/// Error bodies echo it so clients can quote the `x-request-id` they got.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Request tracking middleware
/// Assigns trace/request ids, records metrics and logs completion.
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        uri = %uri,
    );

    async move {
        let start = Instant::now();

        let mut response = REQUEST_ID.scope(request_id.clone(), next.run(req)).await;

        let elapsed = start.elapsed();

        // metric labels must be 'static
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "PUT" => "PUT",
            "DELETE" => "DELETE",
            "OPTIONS" => "OPTIONS",
            _ => "UNKNOWN",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            204 => "204",
            400 => "400",
            401 => "401",
            403 => "403",
            404 => "404",
            413 => "413",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        tracing::info!(
            method = %method,
            uri = %uri,
            status = status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty() && s.len() <= 128)
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
