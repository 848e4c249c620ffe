//! promrelay-transport — record delivery to the exporter daemon.
//!
//! Defines the [`MetricTransport`] seam the sampling loop hands records
//! to, plus the default [`HttpTransport`] that POSTs JSON records to the
//! exporter's submit endpoint.
//!
//! Delivery is fire-and-forget from the instrumented process's point of
//! view: failures are returned to the caller (the periodic runner), which
//! logs and moves on. The transport never retries.

pub mod error;
pub mod http;

pub use error::TransportError;
pub use http::HttpTransport;

use async_trait::async_trait;
use promrelay_metrics::MetricRecord;

/// Delivers one serialized metric record to the aggregating process.
#[async_trait]
pub trait MetricTransport: Send + Sync {
    /// Send a record, taking ownership of it. Callers decide what a
    /// failure means; the transport itself never retries.
    async fn send(&self, record: MetricRecord) -> Result<(), TransportError>;
}
