//! ClearAid server entry point

use clearaid::{
    config::AppConfig, db, handlers::health, middleware::AppState, repository::Storage, routes,
    telemetry,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("clearaid {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // .env files are a development convenience; production sets the environment directly
    if let Ok(env) = std::env::var("CLEARAID_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    telemetry::init_telemetry(&config);
    telemetry::init_metrics();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ClearAid starting...");

    let storage = if config.uses_memory_storage() {
        tracing::warn!("Using in-memory storage; data is lost on restart");
        Storage::memory()
    } else {
        let pool = db::create_pool(&config.database).await?;
        db::run_migrations(&pool).await?;
        tracing::info!("Database initialized");
        Storage::Postgres(pool)
    };

    let addr = config.server.addr.clone();
    let shutdown_timeout = config.server.graceful_shutdown_timeout_secs;

    let app_state = Arc::new(AppState::new(config, storage)?);
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. In-flight requests get `timeout_secs` to
/// finish before the process exits anyway.
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

fn print_help() {
    println!("clearaid {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: clearaid [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --version     Print version information and exit");
    println!("  --help        Print this help message and exit");
    println!();
    println!("Environment:");
    println!("  All configuration is read from CLEARAID_* variables,");
    println!("  e.g. CLEARAID_SECURITY__JWT_SECRET, CLEARAID_DATABASE__URL,");
    println!("  CLEARAID_STORAGE__BACKEND=memory. See .env.example.");
}
