//! Duodraw - room relay and game-state server
//!
//! # Usage
//! ```bash
//! duodraw                          # built-in defaults (or ./duodraw.toml if present)
//! duodraw --config duodraw.toml
//! duodraw --listen 127.0.0.1:9000
//! duodraw --config duodraw.toml --check
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use duodraw_rs::config::{Config, ConfigLoader};
use duodraw_rs::{router, AppState};

const DEFAULT_CONFIG_PATH: &str = "duodraw.toml";

#[derive(Parser, Debug)]
#[command(name = "duodraw")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides `server.listen`
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args)?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(level) = &args.log_level {
        config.server.log_level = level.clone();
    }

    init_logging(&config.server.log_level);

    tracing::info!("Duodraw v{}", env!("CARGO_PKG_VERSION"));

    if args.check {
        tracing::info!("Configuration is valid");
        return Ok(());
    }

    let state = AppState::new(&config.game);
    tracing::info!(
        "Word bank: {} puzzles, turn advance after {}ms",
        state.registry.word_bank().len(),
        config.game.turn_advance_delay_ms
    );

    let app = router(&config, state);

    let addr = config.server.listen;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("🎨 Duodraw server running on http://{}", addr);
    tracing::info!("   WebSocket endpoint: ws://{}{}", addr, config.server.ws_path);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => ConfigLoader::load_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => ConfigLoader::load_or_default(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH)),
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("duodraw_rs={level},duodraw={level},tower_http={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
