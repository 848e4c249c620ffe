//! Metric records — the wire unit between instrumented processes and
//! the exporter.
//!
//! A record is a flat JSON object: a `"type"` discriminator naming the
//! collector that produced it, plus numeric fields. Records are built
//! once per sampling tick and never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One sampled metric record.
///
/// Serializes as `{"type": "<kind>", "<field>": <number>, ...}`.
/// `serde_json::Number` keeps integral samples integral on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Which collector produced this record.
    #[serde(rename = "type")]
    kind: String,

    /// Numeric payload fields, in stable key order.
    #[serde(flatten)]
    fields: BTreeMap<String, serde_json::Number>,
}

impl MetricRecord {
    /// Start a record for the given collector kind.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add an integer field.
    pub fn with_field(mut self, name: impl Into<String>, value: u64) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// The collector kind discriminator.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Look up a field as u64, if present and integral.
    pub fn field(&self, name: &str) -> Option<u64> {
        self.fields.get(name).and_then(serde_json::Number::as_u64)
    }

    /// Number of payload fields (excluding the `type` tag).
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
