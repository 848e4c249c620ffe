//! Error types for record delivery.

use thiserror::Error;

/// Errors that can occur while delivering a metric record.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to serialize metric record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to connect to exporter at {address}: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },

    #[error("http exchange with exporter failed: {0}")]
    Request(#[from] hyper::Error),

    #[error("exporter rejected metric record: HTTP {0}")]
    Status(u16),
}
