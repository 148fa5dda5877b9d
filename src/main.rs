use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jobly_api::config::{AppConfig, Environment};
use jobly_api::database::{DatabaseManager, PgStorage};
use jobly_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "jobly-api", version, about = "Jobly job board API server")]
struct Cli {
    /// Port to listen on (overrides PORT / JOBLY_API_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides JOBLY_API_BIND)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JOBLY_SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(port) = cli.port {
        config.api.port = port;
    }
    if let Some(bind) = cli.bind {
        config.api.bind_address = bind;
    }

    init_tracing(&config);
    info!("Starting Jobly API in {:?} mode", config.environment);

    config.validate().context("invalid configuration")?;

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let bind_addr = format!("{}:{}", config.api.bind_address, config.api.port);
    let state = AppState::new(config, Arc::new(PgStorage::new(pool))).context("failed to load signing keys")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Jobly API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let default_filter = match config.environment {
        Environment::Development => "jobly_api=debug,tower_http=debug",
        _ => "jobly_api=info,tower_http=info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
