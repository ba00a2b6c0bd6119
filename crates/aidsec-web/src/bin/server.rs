//! aidsec-web server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered with
//! `AIDSEC_*` environment variables, loads the incident CSV once, and serves
//! the dashboard over HTTP.

use std::{path::PathBuf, sync::Arc};

use aidsec_core::CachedSource;
use aidsec_csv::CsvSource;
use aidsec_web::{AppState, ServerConfig};
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Aid worker security incidents dashboard")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Incident CSV; overrides `data_path` from the configuration.
  #[arg(short, long)]
  data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let mut server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to read config {:?}", cli.config))?;
  if let Some(data) = cli.data {
    server_cfg.data_path = aidsec_web::expand_tilde(&data);
  }

  // Load the incident table before accepting connections.
  let source = CachedSource::new(CsvSource::new(&server_cfg.data_path));
  let path = server_cfg.data_path.clone();
  let table = tokio::task::spawn_blocking(move || source.get())
    .await
    .context("loader task panicked")?
    .with_context(|| format!("failed to load incidents from {path:?}"))?;

  // Build application state.
  let state = AppState {
    table,
    config: Arc::new(server_cfg.clone()),
  };

  let app = aidsec_web::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
