//! promrelayd — the promrelay exporter daemon.
//!
//! Single binary that assembles the exporter: the record aggregator,
//! self-observability counters, and the HTTP exposition surface.
//! Instrumented processes point their transport at this daemon's
//! `/send-metrics`; a Prometheus-compatible scraper reads `/metrics`.
//!
//! # Usage
//!
//! ```text
//! promrelayd --bind 0.0.0.0:9394 --render-timeout-secs 2
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use promrelay_server::{build_router, ExpositionState, RecordAggregator};

#[derive(Parser)]
#[command(name = "promrelayd", about = "promrelay exporter daemon")]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:9394")]
    bind: SocketAddr,

    /// Budget in seconds for rendering metrics text on a scrape.
    #[arg(long, default_value = "2")]
    render_timeout_secs: u64,

    /// Log full detail for rejected metric submissions.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,promrelayd=debug,promrelay_server=debug"
                    .parse()
                    .unwrap()
            }),
        )
        .init();

    let cli = Cli::parse();

    // The aggregator default is resolved once, at wiring time.
    let aggregator = Arc::new(RecordAggregator::new());
    let state = ExpositionState::new(
        aggregator,
        Duration::from_secs(cli.render_timeout_secs),
        cli.verbose,
    );

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    info!(addr = %cli.bind, "exporter listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("failed to install CTRL+C handler");
            info!("shutdown signal received");
        })
        .await?;

    info!("exporter stopped");
    Ok(())
}
