//! promrelay-metrics — metric primitives for the promrelay exporter.
//!
//! Provides the three building blocks the exporter trades in:
//!
//! ```text
//! MetricRecord   one JSON-serialized sample, tagged with its producer kind
//! Counter        monotonic process-lifetime counter (exporter self-observability)
//! Gauge          point-in-time value built fresh per scrape
//! ```
//!
//! Counters and gauges render themselves as Prometheus text exposition
//! blocks (`# HELP` / `# TYPE` / value).

pub mod exposition;
pub mod record;

pub use exposition::{Counter, Gauge};
pub use record::MetricRecord;
