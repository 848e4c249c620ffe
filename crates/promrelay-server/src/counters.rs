//! Self-observability counters.
//!
//! Three process-lifetime counters owned by one exporter instance.
//! They are never reset and never persisted; a restart starts them over.

use promrelay_metrics::Counter;

/// The exporter's own diagnostic counters.
#[derive(Debug)]
pub struct SelfCounters {
    /// Chunks handed to the aggregator.
    pub metrics_total: Counter,
    /// Submit sessions received, successful or not.
    pub sessions_total: Counter,
    /// Chunks the aggregator refused.
    pub bad_metrics_total: Counter,
}

impl SelfCounters {
    pub fn new() -> Self {
        Self {
            metrics_total: Counter::new(
                "collector_metrics_total",
                "Total metric chunks processed by the exporter.",
            ),
            sessions_total: Counter::new(
                "collector_sessions_total",
                "Total send-metric sessions processed by the exporter.",
            ),
            bad_metrics_total: Counter::new(
                "collector_bad_metrics_total",
                "Total malformed metric submissions rejected by the exporter.",
            ),
        }
    }
}

impl Default for SelfCounters {
    fn default() -> Self {
        Self::new()
    }
}
