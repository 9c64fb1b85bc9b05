//! Newsroom services.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────┐
//!   Client ──────▶│         gateway          │
//!                 │  GET /news               │
//!                 │  GET /news/{id} ─────────┼──────┐
//!                 │  POST /comment           │      │
//!                 └──────┬──────────┬────────┘      │
//!                 1.check│   2.store│               │ list (degrades
//!                        ▼          ▼               ▼  to no comments)
//!                 ┌───────────┐ ┌───────────────────────┐
//!                 │  censor   │ │       comments        │
//!                 │ POST      │ │ POST /comments        │
//!                 │  /check   │ │ GET  /comments?news_id│
//!                 └───────────┘ └───────────────────────┘
//!
//!   X-Request-ID travels on every hop.
//! ```
//!
//! One binary, one service per process:
//! `newsroom [--config newsroom.toml] <gateway|comments|censor>`.

use std::path::PathBuf;

use clap::Parser;

use newsroom::config::{self, ServiceKind};
use newsroom::lifecycle;
use newsroom::observability;

#[derive(Parser)]
#[command(name = "newsroom")]
#[command(about = "Run one of the newsroom services", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service to run.
    #[arg(value_enum)]
    service: ServiceKind,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load_or_default(cli.config.as_deref())?;
    observability::init_logging(&config.observability)?;

    tracing::info!(
        service = %cli.service,
        version = env!("CARGO_PKG_VERSION"),
        "newsroom starting"
    );

    tracing::info!(
        bind_address = %config.bind_address(cli.service),
        upstream_timeout_secs = config.timeouts.upstream_secs,
        shutdown_grace_secs = config.timeouts.shutdown_grace_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        observability::init_metrics(addr)?;
    }

    lifecycle::run_service(cli.service, config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
