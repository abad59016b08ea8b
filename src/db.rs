//! PostgreSQL pool, migrations and health check

use crate::config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

/// Create the connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DbError> {
    let db_url = config.url.as_ref().ok_or(DbError::MissingUrl)?;

    tracing::debug!("Creating database connection pool...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(db_url.expose_secret())
        .await
        .map_err(|e| {
            tracing::error!("Failed to create database pool: {}", e);
            DbError::ConnectionFailed(e.to_string())
        })?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool created successfully"
    );

    Ok(pool)
}

/// Apply pending migrations from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            DbError::MigrationFailed(e.to_string())
        })?;

    tracing::info!("Migrations completed successfully");
    Ok(())
}

pub async fn health_check(pool: &PgPool) -> HealthStatus {
    record_pool_metrics(pool);

    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => {
            tracing::debug!("Database health check: OK");
            HealthStatus::Healthy
        }
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            HealthStatus::Unhealthy
        }
    }
}

pub fn record_pool_metrics(pool: &PgPool) {
    metrics::gauge!("db.pool.size").set(pool.size() as f64);
    metrics::gauge!("db.pool.idle").set(pool.num_idle() as f64);
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database.url is not set")]
    MissingUrl,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// Health check outcome; failure detail stays in the server log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_requires_url() {
        let config = DatabaseConfig {
            url: None,
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 1,
            idle_timeout_secs: 60,
            max_lifetime_secs: 300,
        };

        assert!(matches!(create_pool(&config).await, Err(DbError::MissingUrl)));
    }

    #[tokio::test]
    async fn test_health_check_unreachable_database() {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy("postgres://clearaid@127.0.0.1:1/clearaid")
            .unwrap();

        assert_eq!(health_check(&pool).await, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_db_error_messages() {
        let err = DbError::ConnectionFailed("Connection refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: Connection refused");
    }
}
