//! promrelay-instrument — in-process sampling for worker-pool servers.
//!
//! Lives inside the instrumented process and ships one metric record per
//! sampling tick to the exporter daemon:
//!
//! ```text
//! PeriodicRunner (one tokio task)
//!   └── loop: WorkerPoolCollector::collect()
//!         └── StatSource::listener_stats()   ← /proc/net/{tcp,tcp6,unix}
//!       MetricTransport::send(record)
//!       sleep(interval)
//! ```
//!
//! A failed tick is logged and absorbed; the loop's cadence is never
//! broken by a slow or unreachable stat source.

pub mod collector;
pub mod error;
pub mod runner;
pub mod source;

pub use collector::WorkerPoolCollector;
pub use error::StatQueryError;
pub use runner::PeriodicRunner;
pub use source::{Endpoint, ListenerStats, ProcfsStatSource, StatSource};
