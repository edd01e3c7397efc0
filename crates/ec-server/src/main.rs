//! EC site API server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ec_server::{build_router, init_logging, AppState, LogFormat, ServerConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ec-server")]
#[command(about = "EC site storefront and admin API", version)]
struct Args {
    /// Config file (TOML or JSON). Discovered from the working directory if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let (mut config, config_path) = ServerConfig::resolve(args.config.as_deref(), &cwd)?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    init_logging(&config.logging.level, config.logging.format, args.verbose);

    match &config_path {
        Some(path) => info!(path = %path.display(), "config loaded"),
        None => info!("no config file found, using defaults"),
    }

    let addr = config.bind_addr()?;
    let state = AppState::new(config).context("Failed to initialise user directory")?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
