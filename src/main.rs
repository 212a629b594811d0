//! servicebay API server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request id / trace / timeout / body limit
//!                  │
//!                  ▼
//!            admission gate ──(over quota)──▶ 429 + Retry-After
//!          (client ip, tier)
//!                  │
//!                  ▼
//!               handler ──▶ sanitize(body, INPUT) ──▶ draft ──▶ validate
//!                  │
//!                  ▼
//!                store ──▶ project(record, PUBLIC) ──▶ Client
//!
//!   failures at any step ──▶ ApiError::normalize ──▶ {"error": ...}
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use servicebay::config::{load_config, ConfigWatcher, ServiceConfig};
use servicebay::lifecycle::{signals, Shutdown};
use servicebay::observability::{logging, metrics};
use servicebay::{mail, HttpServer};

#[derive(Parser)]
#[command(name = "servicebay", version, about = "Vehicle-service booking API")]
struct Args {
    /// Path to the TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "SERVICEBAY_CONFIG")]
    config: Option<PathBuf>,

    /// Reload rate-limit tiers when the config file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "servicebay starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        tiers = ?config.rate_limit.tiers,
        mail_enabled = config.mail.enabled,
        "Configuration loaded"
    );

    if config.admin.uses_placeholder_key() {
        tracing::warn!("admin.api_key is the shipped placeholder; set a real key before exposing admin routes");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Held for the lifetime of the server; dropping it stops the watcher.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => {
            let (_, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let mailer = mail::from_config(&config.mail)?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::forward_signals(&shutdown);

    let server = HttpServer::new(config, mailer);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
