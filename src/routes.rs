//! Route registration

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
};

use crate::{auth::access_guard_middleware, config::CorsConfig, handlers, middleware::AppState};

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let health_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    let auth_routes = Router::new()
        .route("/api/auth/signin", post(handlers::auth::signin))
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route(
            "/api/auth/check-username/{username}",
            get(handlers::auth::check_username),
        )
        .route("/api/auth/me", get(handlers::auth::me));

    let access_routes = Router::new()
        .route("/api/test/all", get(handlers::access::all_access))
        .route("/api/test/user", get(handlers::access::user_access));

    let post_routes = Router::new()
        .route(
            "/api/posts",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route("/api/posts/search", get(handlers::post::search_posts))
        .route("/api/posts/pending", get(handlers::post::list_pending_posts))
        .route(
            "/api/posts/author/{author_id}",
            get(handlers::post::list_posts_by_author),
        )
        .route(
            "/api/posts/{id}",
            get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route("/api/posts/{id}/approve", put(handlers::post::approve_post));

    let payment_routes = Router::new()
        .route("/payments/process", post(handlers::payment::process_payment))
        .route("/payments/receipt", post(handlers::payment::payment_receipt));

    // Layers run bottom-up: CORS first, then tracking, body limit, access guard.
    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(access_routes)
        .merge(post_routes)
        .merge(payment_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.guard.clone(),
            access_guard_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(state.config.server.max_body_bytes))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .layer(cors_layer(&state.config.cors))
        .with_state(state)
}
