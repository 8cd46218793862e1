//! Ratelist Daemon - Main Entry Point
//! Serves the rate-limited queue commands over JSON-RPC

mod config;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::DaemonConfig;
use ratelist_api_rpc::{RpcServer, RpcServerConfig};
use ratelist_core::application::ThrottleService;
use ratelist_core::port::SystemTimeProvider;
use ratelist_infra_sqlite::SqliteStore;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() -> Result<()> {
    let log_format = std::env::var("RATELIST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("ratelist=info"))?;

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    init_logging()?;
    info!("Ratelist daemon v{} starting...", VERSION);

    // 2. Configuration
    let config = DaemonConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    info!(
        db_path = %config.db_path,
        variant = %config.variant,
        key_prefix = %config.key_prefix,
        "Configuration loaded"
    );

    // 3. Store
    if let Some(parent) = Path::new(&config.db_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let store = SqliteStore::open(&config.database_url())
        .await
        .map_err(|e| anyhow::anyhow!("Store initialization failed: {}", e))?;

    // 4. Wiring
    let service = Arc::new(ThrottleService::new(
        Arc::new(store),
        Arc::new(SystemTimeProvider),
        config.reserved_keys(),
    ));

    // 5. JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "Ready. Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");
    Ok(())
}
