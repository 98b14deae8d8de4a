use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use marquee_config::{ConfigLoad, ConfigLoader};
use marquee_server::{AppState, routes};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "marquee-server")]
#[command(about = "Movie-browsing web service backed by TMDB")]
struct Cli {
    /// Server port (overrides config)
    #[arg(short, long, env = "MARQUEE_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "MARQUEE_HOST")]
    host: Option<String>,

    /// Library data directory (overrides config)
    #[arg(long, env = "MARQUEE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path to an env file to load instead of ./.env
    #[arg(long, env = "MARQUEE_ENV_FILE")]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let loader = match &cli.env_file {
        Some(path) => ConfigLoader::new().with_env_file(path),
        None => ConfigLoader::new(),
    };
    let ConfigLoad { mut config, warnings } =
        loader.load().context("failed to load configuration")?;

    for warning in &warnings {
        warn!("configuration warning: {warning}");
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(data_dir) = cli.data_dir {
        config.library.data_dir = data_dir;
    }

    info!(
        data_dir = %config.data_dir().display(),
        tmdb = %config.tmdb.base_url,
        "configuration loaded"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config)?;

    spawn_cache_sweeper(&state);

    let app = routes::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down cleanly");
    Ok(())
}

/// Evict stale catalog pages in the background so an idle process does
/// not hold them past their revalidation window.
fn spawn_cache_sweeper(state: &AppState) {
    let catalog = state.catalog.clone();
    let period = state.config.cache.catalog_ttl.max(Duration::from_secs(60));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // first tick fires immediately
        loop {
            interval.tick().await;
            let evicted = catalog.sweep();
            if evicted > 0 {
                debug!(evicted, "swept catalog cache");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
}
