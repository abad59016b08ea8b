//! Shared helpers for the integration tests
//! Every test gets a fresh app on the in-memory store.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use clearaid::{
    auth::{ManualClock, PasswordHasher},
    config::{
        AppConfig, CorsConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig,
        StorageConfig, DEFAULT_PUBLIC_PATHS,
    },
    middleware::AppState,
    repository::Storage,
    routes,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
            max_body_bytes: 64 * 1024,
        },
        storage: StorageConfig {
            backend: "memory".to_string(),
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            token_ttl_secs: 3600,
            password_min_length: 8,
            allow_admin_signup: true,
            public_paths: DEFAULT_PUBLIC_PATHS.iter().map(|s| s.to_string()).collect(),
        },
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

/// Test app plus the clock driving token issue and expiry
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub clock: Arc<ManualClock>,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_config(create_test_config())
}

pub fn create_test_app_with_config(config: AppConfig) -> TestApp {
    create_test_app_with_storage(config, Storage::memory())
}

pub fn create_test_app_with_storage(config: AppConfig, storage: Storage) -> TestApp {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    // cheap hashing parameters keep the suite fast
    let state = Arc::new(
        AppState::with_clock(
            config,
            storage,
            clock.clone(),
            PasswordHasher::with_params(1024, 1, 1),
        )
        .expect("Failed to build test app state"),
    );

    TestApp {
        router: routes::create_router(state.clone()),
        state,
        clock,
    }
}

/// Raw response: status, selected headers, body bytes
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).expect("response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).to_string()
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let header_value = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };
        let content_type = header_value(header::CONTENT_TYPE.as_str());
        let request_id = header_value("x-request-id");
        let bytes = response.into_body().collect().await.unwrap().to_bytes().to_vec();

        TestResponse {
            status,
            content_type,
            request_id,
            bytes,
        }
    }

    pub async fn signup(&self, username: &str, password: &str, role: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({
                "username": username,
                "password": password,
                "role": role,
            })),
        )
        .await
    }

    pub async fn signin(&self, username: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/auth/signin",
            None,
            Some(json!({
                "username": username,
                "password": password,
            })),
        )
        .await
    }

    /// Sign up and sign in, returning the bearer token
    pub async fn register_user(&self, username: &str, role: &str) -> String {
        let password = "p@ss1234";
        let response = self.signup(username, password, role).await;
        assert_eq!(response.status, StatusCode::OK, "signup failed: {}", response.text());

        let response = self.signin(username, password).await;
        assert_eq!(response.status, StatusCode::OK, "signin failed: {}", response.text());
        response.json()["token"].as_str().unwrap().to_string()
    }

    /// Create a post as `token` and return its JSON
    pub async fn create_post(&self, token: &str, title: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/posts",
                Some(token),
                Some(json!({
                    "title": title,
                    "body": "Help us reach the goal",
                    "moneyGoal": 5000.0,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()
    }
}
