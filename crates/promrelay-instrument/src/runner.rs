//! Periodic sampling loop.
//!
//! One tokio task per instrumented endpoint: collect, send, sleep,
//! repeat. Both the collect and the send step can fail on any tick;
//! failures are logged and absorbed so the cadence survives a flapping
//! stat source or an unreachable exporter. The sleep runs on every
//! iteration regardless of the tick's outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use promrelay_transport::MetricTransport;

use crate::collector::WorkerPoolCollector;

/// Default sampling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Drives a collector on a fixed interval inside its own task.
pub struct PeriodicRunner;

impl PeriodicRunner {
    /// Launch the sampling loop.
    ///
    /// The loop runs for the lifetime of the hosting process; the
    /// returned handle is the owner's cancellation point
    /// (`JoinHandle::abort`).
    pub fn start(
        collector: WorkerPoolCollector,
        transport: Arc<dyn MetricTransport>,
        interval: Duration,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                endpoint = %collector.endpoint(),
                interval_secs = interval.as_secs(),
                "worker pool sampling started"
            );

            loop {
                match collector.collect() {
                    Ok(record) => {
                        if let Err(e) = transport.send(record).await {
                            warn!(error = %e, "failed to deliver worker pool sample");
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to collect worker pool stats");
                    }
                }

                tokio::time::sleep(interval).await;
            }
        })
    }
}
