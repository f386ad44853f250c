//! Request observer host (v1)
//!
//! Serves a small demonstration API with the request observer in front of
//! it, emitting one structured access record per request.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request           ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ RequestObserver ─▶ timeout ─▶ handler     │
//!                              │        │                                     │
//!     Client Response          │        │ (after the chain completes)         │
//!     ◀────────────────────────┼────────┤                                     │
//!                              │        ▼                                     │
//!                              │   AccessRecord ─▶ RecordSink ─▶ tracing      │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use request_observer::config::{load_config, ServerConfig};
use request_observer::lifecycle::{signals, Shutdown};
use request_observer::observability::logging;
use request_observer::observer::TracingSink;
use request_observer::HttpServer;

#[derive(Parser)]
#[command(name = "request-observer")]
#[command(about = "HTTP server with structured per-request access logging", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.logging)?;

    tracing::info!("request-observer v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        excluded_paths = ?config.observer.excluded_paths,
        capture_body = config.observer.capture_body,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(&shutdown);

    let server = HttpServer::new(config, Arc::new(TracingSink));
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
