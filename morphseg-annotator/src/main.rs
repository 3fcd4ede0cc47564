//! morphseg-annotator - terminal annotation client
//!
//! Logs the worker in against the annotation backend and reads one command
//! per line from stdin; see `Gesture` for the command syntax.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use morphseg_annotator::backend::HttpBackend;
use morphseg_annotator::config::{AnnotatorConfig, ConfigOverrides};
use morphseg_annotator::terminal::TerminalView;
use morphseg_annotator::view::Gesture;
use morphseg_annotator::SessionController;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
commands:
  t <i>              toggle boundary after character i
  r                  reset all boundaries
  s <id>             split off context <id> as a different sense
  n                  mark as non-word
  k                  skip
  u                  go back to skipped words
  ok                 submit segmentation
  tag <i> <PRE|STM|SUF>
  b                  back to segmentation
  done               submit tags
  retry              retry a failed fetch
  q                  quit";

/// Command-line arguments for morphseg-annotator
#[derive(Parser, Debug)]
#[command(name = "morphseg-annotator")]
#[command(about = "Terminal client for morph segmentation annotation")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/morphseg/annotator.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Annotation backend base URL
    #[arg(short, long)]
    backend_url: Option<String>,

    /// Worker email
    #[arg(short, long)]
    email: Option<String>,

    /// Display width reported on login, in pixels
    #[arg(short, long)]
    width: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AnnotatorConfig::load(
        args.config.as_deref(),
        ConfigOverrides {
            backend_url: args.backend_url,
            email: args.email,
            display_width: args.width,
        },
    )?;

    // stdout belongs to the terminal view
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting morphseg-annotator v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.backend_url
    );

    let backend = HttpBackend::new(&config.backend_url, config.request_timeout)
        .context("Failed to create backend client")?;
    let view = TerminalView::new(std::io::stdout());
    let mut session = SessionController::new(Arc::new(backend), view, config.session_config());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let email = match config.email.clone() {
        Some(email) => email,
        None => {
            println!("Email:");
            lines
                .next_line()
                .await?
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .context("No email given")?
        }
    };

    // A failed queue or word fetch after login is reported and can be retried
    if let Err(e) = session.login(&email).await {
        if !session.is_logged_in() {
            return Err(e).context("Login failed");
        }
        warn!(error = %e, "Session start incomplete, use 'retry'");
    }
    println!("{}", HELP);

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };
            let line = line.trim();
            match line {
                "" => continue,
                "q" | "quit" => break,
                "h" | "help" | "?" => {
                    println!("{}", HELP);
                    continue;
                }
                _ => {}
            }
            match line.parse::<Gesture>() {
                Ok(gesture) => {
                    if tx.send(gesture).await.is_err() {
                        break;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
    });

    session.run(rx).await;

    if let Some(worker) = session.worker() {
        info!(completed = worker.completed_count, "Session finished");
    }
    Ok(())
}
