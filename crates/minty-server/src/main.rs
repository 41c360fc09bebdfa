//! minty-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid by the
//! environment, loads the site content, and serves the JSON API over HTTP.
//! On Ctrl-C the listener stops and in-flight notifications are drained
//! before exit.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use minty_api::AppState;
use minty_core::{
  content::ContentStore,
  intake::LeadIntake,
  notify::NotificationSink,
};
use minty_server::ServerConfig;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Minty Labs site API server")]
struct Cli {
  /// Path to the TOML configuration file. Missing files are ignored.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| {
      format!("failed to load configuration from {:?}", cli.config)
    })?;

  let content = ContentStore::load(&cfg.content_dir)
    .with_context(|| format!("failed to load content from {:?}", cfg.content_dir))?;
  tracing::info!(
    testimonials = content.testimonials().len(),
    case_studies = content.case_studies().len(),
    "content loaded"
  );

  let notifier = minty_notify::notifier(cfg.email(), cfg.telegram())
    .context("failed to build notification sinks")?;
  tracing::info!(
    email = notifier.email.is_enabled(),
    email_configured = notifier.email.is_configured(),
    telegram = notifier.chat.is_enabled(),
    telegram_configured = notifier.chat.is_configured(),
    "notification channels"
  );

  let intake = Arc::new(LeadIntake::new(notifier));
  let state = AppState {
    intake:      Arc::clone(&intake),
    content:     Arc::new(content),
    environment: Arc::from(cfg.environment.as_str()),
  };
  let app = minty_server::app(state);

  tracing::info!(
    environment = %cfg.environment,
    "Listening on http://{}",
    cfg.listen_addr
  );
  let listener = TcpListener::bind(&cfg.listen_addr)
    .await
    .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("draining notification tasks");
  intake.shutdown().await;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
}
