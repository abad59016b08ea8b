//! Health check handlers: `/health` and `/ready`

use axum::{extract::State, http::StatusCode, Json};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::{db, middleware::AppState, repository::Storage};

/// Liveness response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Readiness response
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: Vec<HealthCheck>,
}

/// A single dependency check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static APP_START_TIME: OnceCell<Instant> = OnceCell::new();

/// Record the process start; only the first call counts
pub fn set_start_time() {
    let _ = APP_START_TIME.set(Instant::now());
}

pub fn get_uptime() -> u64 {
    APP_START_TIME
        .get()
        .map_or(0, |start| start.elapsed().as_secs())
}

/// Liveness probe, no dependency checks
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: get_uptime(),
    })
}

/// Readiness probe: 503 until every dependency check passes
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let storage_health = match &state.storage {
        Storage::Postgres(pool) => db::health_check(pool).await,
        Storage::Memory(_) => db::HealthStatus::Healthy,
    };

    let checks = vec![HealthCheck::from_status("storage", storage_health)];
    let ready = checks.iter().all(|c| c.status == "healthy");

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadinessResponse { ready, checks }))
}

impl HealthCheck {
    fn from_status(name: &str, status: db::HealthStatus) -> Self {
        match status {
            db::HealthStatus::Healthy => Self {
                name: name.to_string(),
                status: "healthy".to_string(),
                message: None,
            },
            db::HealthStatus::Unhealthy => Self {
                name: name.to_string(),
                status: "unhealthy".to_string(),
                message: Some("unavailable".to_string()),
            },
        }
    }
}
