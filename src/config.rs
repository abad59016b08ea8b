//! Configuration
//! Loaded once at startup from defaults plus `CLEARAID_*` environment variables.
//! Sensitive values are wrapped in `Secret` so they never reach the logs.

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

/// Routes reachable without a bearer token.
pub const DEFAULT_PUBLIC_PATHS: &[&str] = &[
    "POST /api/auth/**",
    "GET /api/auth/**",
    "GET /api/test/all",
    "GET /api/posts/**",
    "GET /health",
    "GET /ready",
];

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:8097"
    pub addr: String,
    /// Graceful shutdown timeout (seconds)
    pub graceful_shutdown_timeout_secs: u64,
    /// Maximum accepted request body size (bytes)
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `postgres` or `memory`
    pub backend: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL, required when the postgres backend is selected
    pub url: Option<Secret<String>>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
    pub level: String,
    /// json, pretty
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// HMAC signing secret for bearer tokens
    pub jwt_secret: Secret<String>,
    /// Token lifetime (seconds)
    pub token_ttl_secs: u64,
    pub password_min_length: usize,
    /// Whether `/api/auth/signup` accepts the ADMIN role
    pub allow_admin_signup: bool,
    /// Allow-list patterns, `[METHOD ]/path` with `*` and trailing `/**`
    pub public_paths: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        settings = settings
            .set_default("server.addr", "0.0.0.0:8097")?
            .set_default("server.graceful_shutdown_timeout_secs", 30)?
            .set_default("server.max_body_bytes", 1024 * 1024)?
            .set_default("storage.backend", "postgres")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("security.token_ttl_secs", 86400)?
            .set_default("security.password_min_length", 8)?
            .set_default("security.allow_admin_signup", false)?
            .set_default("security.public_paths", DEFAULT_PUBLIC_PATHS.to_vec())?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?;

        // CLEARAID_SECURITY__JWT_SECRET, CLEARAID_CORS__ALLOWED_ORIGINS=a,b ...
        settings = settings.add_source(
            Environment::with_prefix("CLEARAID")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("security.public_paths")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let config: AppConfig = settings.build()?.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Whether the in-memory store was selected
    pub fn uses_memory_storage(&self) -> bool {
        self.storage.backend.eq_ignore_ascii_case("memory")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(port_str) = self.server.addr.split(':').next_back() {
            if let Ok(port) = port_str.parse::<u16>() {
                if port != 0 && port < 1024 {
                    return Err(ConfigError::Message("Server port should be >= 1024".to_string()));
                }
            }
        }

        match self.storage.backend.to_lowercase().as_str() {
            "memory" => {}
            "postgres" => {
                if self.database.url.is_none() {
                    return Err(ConfigError::Message(
                        "database.url is required for the postgres backend".to_string(),
                    ));
                }
            }
            other => {
                return Err(ConfigError::Message(format!(
                    "Invalid storage backend: {}. Must be one of: postgres, memory",
                    other
                )))
            }
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                )))
            }
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid log format: {}. Must be one of: json, pretty",
                    self.logging.format
                )))
            }
        }

        if self.database.max_connections < self.database.min_connections {
            return Err(ConfigError::Message(
                "max_connections must be >= min_connections".to_string(),
            ));
        }

        if self.security.jwt_secret.expose_secret().len() < 32 {
            return Err(ConfigError::Message(
                "JWT secret must be at least 32 characters long".to_string(),
            ));
        }

        if self.security.token_ttl_secs < 60 || self.security.token_ttl_secs > 604800 {
            return Err(ConfigError::Message(
                "token_ttl_secs must be between 60 and 604800 (1 minute to 7 days)".to_string(),
            ));
        }

        if self.security.password_min_length < 6 || self.security.password_min_length > 128 {
            return Err(ConfigError::Message(
                "password_min_length must be between 6 and 128".to_string(),
            ));
        }

        for pattern in &self.security.public_paths {
            crate::auth::middleware::RoutePattern::parse(pattern).map_err(ConfigError::Message)?;
        }

        Ok(())
    }
}
