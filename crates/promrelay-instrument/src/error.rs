//! Error types for stat sampling.

use thiserror::Error;

/// Errors that can occur while querying listener statistics.
#[derive(Debug, Error)]
pub enum StatQueryError {
    #[error("no listener found for endpoint {0}")]
    UnknownEndpoint(String),

    #[error("malformed endpoint address {address}: {reason}")]
    Malformed { address: String, reason: String },

    #[error("failed to read socket statistics: {0}")]
    Io(#[from] std::io::Error),
}
