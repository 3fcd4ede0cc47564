//! morphseg-devserver - development annotation backend
//!
//! Serves the annotation backend API from an in-memory corpus so the
//! annotator can be run end to end without the production store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use morphseg_devserver::config::{ConfigOverrides, DevServerConfig};
use morphseg_devserver::{build_router, AppState, Corpus};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for morphseg-devserver
#[derive(Parser, Debug)]
#[command(name = "morphseg-devserver")]
#[command(about = "Development backend for morph segmentation annotation")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/morphseg/devserver.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Corpus TOML file
    #[arg(long, env = "MORPHSEG_CORPUS")]
    corpus: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "MORPHSEG_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = DevServerConfig::load(
        args.config.as_deref(),
        ConfigOverrides {
            bind: args.bind,
            corpus: args.corpus,
        },
    )?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting morphseg-devserver v{}", env!("CARGO_PKG_VERSION"));

    let corpus = Corpus::load(&config.corpus)
        .with_context(|| format!("Failed to load corpus {}", config.corpus.display()))?;
    let app = build_router(AppState::new(corpus)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("morphseg-devserver listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
