//! showlog-server - Live performance log service
//!
//! Stores performance records in SQLite, accepts poster uploads and serves
//! the statistics dashboard API.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use showlog_common::config::{ConfigOverrides, ServerConfig, TomlConfig};
use showlog_common::db::init::init_database;
use showlog_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for showlog-server
#[derive(Parser, Debug)]
#[command(name = "showlog-server")]
#[command(about = "Live performance log and statistics service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SHOWLOG_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SHOWLOG_BIND")]
    bind: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "SHOWLOG_DATABASE")]
    database: Option<PathBuf>,

    /// Directory where uploaded posters are stored
    #[arg(long, env = "SHOWLOG_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// TOML config file (also read from SHOWLOG_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: it carries the log level
    let (file_config, config_source) =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let config = ServerConfig::resolve(
        ConfigOverrides {
            bind_address: args.bind,
            port: args.port,
            database_path: args.database,
            upload_dir: args.upload_dir,
        },
        file_config,
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=debug", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting showlog-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match &config_source {
        Some(path) => info!("Config file: {}", path.display()),
        None => warn!("No config file found, using built-in defaults"),
    }
    info!("Database path: {}", config.database_path.display());
    info!("Upload directory: {}", config.upload_dir.display());

    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address))?;

    let app = build_router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("showlog-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
