//! Worker-pool sample collector.
//!
//! One `collect()` call queries the stat source and produces one
//! immutable record. No partial records: a failed query fails the whole
//! sample.

use std::sync::Arc;

use promrelay_metrics::MetricRecord;

use crate::source::{Endpoint, StatSource};
use crate::StatQueryError;

/// Record kind tag for worker-pool samples.
pub const RECORD_KIND: &str = "worker_pool";

/// Samples a worker-pool server's listening endpoint.
pub struct WorkerPoolCollector {
    endpoint: Endpoint,
    workers_total: u64,
    source: Arc<dyn StatSource>,
}

impl WorkerPoolCollector {
    /// Create a collector for the listener at `address` (a TCP
    /// `host:port` or a filesystem socket path) serviced by a pool of
    /// `workers_total` processes.
    pub fn new(address: &str, workers_total: u64, source: Arc<dyn StatSource>) -> Self {
        Self {
            endpoint: Endpoint::parse(address),
            workers_total,
            source,
        }
    }

    /// The endpoint this collector samples.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Take one sample.
    ///
    /// `workers_total` is the configured pool size, not a measurement;
    /// it rides along so dashboards can plot utilization without a
    /// second source of truth.
    pub fn collect(&self) -> Result<MetricRecord, StatQueryError> {
        let stats = self.source.listener_stats(&self.endpoint)?;

        Ok(MetricRecord::new(RECORD_KIND)
            .with_field("active_workers_total", stats.active)
            .with_field("request_backlog_total", stats.queued)
            .with_field("workers_total", self.workers_total))
    }
}
