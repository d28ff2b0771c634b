//! PackFlow Server — Returnable Packaging Tracking Platform
//!
//! Main entry point: runs migrations and the periodic low-stock
//! threshold evaluator. The load lifecycle and inventory services are
//! library entry points consumed by the embedding API layer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use packflow_core::config::AppConfig;
use packflow_core::error::AppError;
use packflow_database::connection::DatabasePool;
use packflow_database::repositories::alert::AlertRepository;
use packflow_service::AlertService;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("PACKFLOW_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting PackFlow v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    packflow_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Initialize alerting ──────────────────────────────
    let alert_repo = Arc::new(AlertRepository::new(db.pool().clone()));
    let alert_service = Arc::new(AlertService::new(Arc::clone(&alert_repo), &config.alerting));

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 4: Start threshold evaluation loop ──────────────────
    let sweep_handle = if config.alerting.enabled {
        let interval = Duration::from_secs(config.alerting.evaluation_interval_seconds);
        tracing::info!(
            interval_seconds = interval.as_secs(),
            "Starting threshold evaluator"
        );

        let service = Arc::clone(&alert_service);
        let mut cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match service.evaluate_thresholds().await {
                            Ok(raised) if !raised.is_empty() => {
                                tracing::info!(raised = raised.len(), "Threshold sweep raised alerts");
                            }
                            Ok(_) => {}
                            Err(e) => tracing::error!("Threshold sweep failed: {e}"),
                        }
                    }
                    _ = cancel.changed() => break,
                }
            }
        }))
    } else {
        tracing::info!("Threshold evaluator disabled");
        None
    };

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(true);

    if let Some(handle) = sweep_handle {
        let _ = tokio::time::timeout(Duration::from_secs(10), handle).await;
    }

    db.close().await;
    tracing::info!("PackFlow server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
