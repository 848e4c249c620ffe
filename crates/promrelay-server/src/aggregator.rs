//! Record aggregation.
//!
//! [`Aggregator`] is the seam between the HTTP surface and whatever
//! merges inbound records into durable metric state. The default
//! [`RecordAggregator`] keeps last-value gauges per record kind, which
//! is what a worker-pool sample stream needs; richer accumulation
//! semantics plug in behind the same trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use promrelay_metrics::Gauge;

/// Errors raised while ingesting one submitted chunk.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed metric chunk: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{reason}")]
    Rejected { status: u16, reason: String },
}

impl IngestError {
    /// The HTTP status this failure should surface as, when it carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Parse(_) => None,
            Self::Rejected { status, .. } => Some(*status),
        }
    }

    fn rejected(status: u16, reason: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            reason: reason.into(),
        }
    }
}

/// Merges inbound serialized records and renders accumulated state.
#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Merge one serialized record into the aggregate state.
    async fn ingest(&self, chunk: &[u8]) -> Result<(), IngestError>;

    /// Render accumulated state as Prometheus exposition text.
    ///
    /// May be slow; callers apply their own deadline.
    async fn render_text(&self) -> String;
}

/// In-process aggregator: per-kind last-value fields rendered as gauges.
pub struct RecordAggregator {
    /// kind → field → latest value.
    state: RwLock<BTreeMap<String, BTreeMap<String, f64>>>,
}

impl RecordAggregator {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of distinct record kinds seen so far.
    pub async fn kind_count(&self) -> usize {
        self.state.read().await.len()
    }
}

impl Default for RecordAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Aggregator for RecordAggregator {
    async fn ingest(&self, chunk: &[u8]) -> Result<(), IngestError> {
        let value: serde_json::Value = serde_json::from_slice(chunk)?;
        let Some(object) = value.as_object() else {
            return Err(IngestError::rejected(422, "metric record must be a JSON object"));
        };
        let Some(kind) = object.get("type").and_then(serde_json::Value::as_str) else {
            return Err(IngestError::rejected(422, "metric record missing its type tag"));
        };

        let mut state = self.state.write().await;
        let fields = state.entry(kind.to_string()).or_default();
        for (key, field_value) in object {
            if key == "type" {
                continue;
            }
            if let Some(number) = field_value.as_f64() {
                fields.insert(key.clone(), number);
            }
        }
        Ok(())
    }

    async fn render_text(&self) -> String {
        let state = self.state.read().await;
        let mut blocks = Vec::new();
        for (kind, fields) in state.iter() {
            for (field, value) in fields {
                let gauge = Gauge::new(
                    format!("{kind}_{field}"),
                    format!("Latest {field} reported for {kind}."),
                    *value,
                );
                blocks.push(gauge.to_exposition_text());
            }
        }
        blocks.join("\n\n")
    }
}
