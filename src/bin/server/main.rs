use anyhow::{Context, Result};
use clap::Parser;
use object_gateway::{
    Owner,
    app::{AppBuilder, AppConfig, StorageBackend},
};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "object-gateway")]
#[command(about = "S3 gateway serving version listings and backup capability objects", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend type (memory, local)
    #[arg(long, env = "STORAGE_BACKEND", default_value = "memory")]
    storage_backend: String,

    /// Data directory; object root for the local backend and source of capacity figures
    #[arg(long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Owner ID reported in version listings
    #[arg(long, env = "OWNER_ID", default_value = "maxiofs")]
    owner_id: String,

    /// Owner display name reported in version listings
    #[arg(long, env = "OWNER_DISPLAY_NAME", default_value = "MaxIOFS")]
    owner_display_name: String,

    /// Model name reported in system.xml
    #[arg(long, env = "MODEL_NAME", default_value = "MaxIOFS")]
    model_name: String,

    /// Per-request limit on backend work, in seconds
    #[arg(long, env = "BACKEND_TIMEOUT_SECS")]
    backend_timeout_secs: Option<u64>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend.as_str() {
            "memory" => StorageBackend::InMemory,
            "local" => {
                let root = self
                    .data_dir
                    .clone()
                    .context("DATA_DIR is required for the local backend")?;
                StorageBackend::LocalFileSystem { root }
            }
            _ => anyhow::bail!("Unknown storage backend: {}", self.storage_backend),
        };

        Ok(AppConfig {
            storage_backend,
            data_dir: self.data_dir.clone(),
            owner: Owner::new(&self.owner_id, &self.owner_display_name),
            model_name: self.model_name.clone(),
            backend_timeout: self
                .backend_timeout_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
        })
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.log_level))
            .context("Invalid log level")?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to initialize logging")?;

        Ok(())
    }
}

async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown requested, cancelling in-flight requests");
    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting object gateway");
    info!("Storage backend: {}", cli.storage_backend);

    let config = cli.to_app_config()?;
    let shutdown = CancellationToken::new();

    let app_services = AppBuilder::new()
        .with_config(config)
        .with_shutdown_token(shutdown.clone())
        .build()
        .await
        .context("Failed to build application")?;

    let router = app_services.router();

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    tokio::spawn(shutdown_signal(shutdown.clone()));

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .context("Failed to start server")?;

    Ok(())
}
