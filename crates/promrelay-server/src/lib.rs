//! promrelay-server — the exporter daemon's HTTP surface.
//!
//! Two routes, everything else is 404:
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition of aggregated state |
//! | POST | `/send-metrics` | Inbound metric record submission |
//!
//! The scrape path renders the aggregator under a deadline and prepends
//! the exporter's own health/RSS gauges and self-observability counters;
//! the submit path streams the body chunk-by-chunk into the aggregator.

pub mod aggregator;
pub mod counters;
pub mod handlers;
pub mod introspect;

pub use aggregator::{Aggregator, IngestError, RecordAggregator};
pub use counters::SelfCounters;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;

/// Scrape route.
pub const SCRAPE_PATH: &str = "/metrics";

/// Submit route.
pub const SUBMIT_PATH: &str = "/send-metrics";

/// Default budget for rendering the aggregator's text on a scrape.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared state for the exposition handlers.
///
/// Counters and the aggregator are process-wide and shared across all
/// in-flight requests; everything else is per-request.
#[derive(Clone)]
pub struct ExpositionState {
    pub aggregator: Arc<dyn Aggregator>,
    pub counters: Arc<SelfCounters>,
    pub render_timeout: Duration,
    /// Emit full ingestion error detail to the diagnostic stream.
    pub verbose: bool,
}

impl ExpositionState {
    /// Wire up server state around an aggregator.
    pub fn new(aggregator: Arc<dyn Aggregator>, render_timeout: Duration, verbose: bool) -> Self {
        Self {
            aggregator,
            counters: Arc::new(SelfCounters::new()),
            render_timeout,
            verbose,
        }
    }
}

/// Build the exposition router.
pub fn build_router(state: ExpositionState) -> Router {
    Router::new()
        .route(SCRAPE_PATH, get(handlers::scrape))
        .route(SUBMIT_PATH, post(handlers::submit))
        .fallback(handlers::not_found)
        .with_state(state)
}
