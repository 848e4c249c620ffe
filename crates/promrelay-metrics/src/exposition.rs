//! Prometheus text exposition blocks.
//!
//! Each metric renders a three-line block:
//!
//! ```text
//! # HELP collector_sessions_total Total send-metric sessions processed.
//! # TYPE collector_sessions_total counter
//! collector_sessions_total 42
//! ```
//!
//! Blocks carry no trailing newline; callers join them with blank lines.

use std::sync::atomic::{AtomicU64, Ordering};

/// A monotonically increasing counter with a help description.
///
/// Shared across concurrent request handlers; increments use relaxed
/// atomics since no cross-counter ordering is needed.
#[derive(Debug)]
pub struct Counter {
    name: String,
    help: String,
    value: AtomicU64,
}

impl Counter {
    /// Create a counter starting at zero.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            value: AtomicU64::new(0),
        }
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment by an arbitrary amount.
    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Current value.
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Render the exposition block for this counter.
    pub fn to_exposition_text(&self) -> String {
        format!(
            "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}",
            name = self.name,
            help = self.help,
            value = self.get()
        )
    }
}

/// A point-in-time gauge, constructed fresh for a single response.
#[derive(Debug, Clone)]
pub struct Gauge {
    name: String,
    help: String,
    value: f64,
}

impl Gauge {
    /// Create a gauge with its observed value.
    pub fn new(name: impl Into<String>, help: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            value,
        }
    }

    /// Observed value.
    pub fn get(&self) -> f64 {
        self.value
    }

    /// Render the exposition block for this gauge.
    ///
    /// Integral values render without a decimal point.
    pub fn to_exposition_text(&self) -> String {
        let rendered = if self.value.fract() == 0.0 && self.value.abs() < u64::MAX as f64 {
            format!("{}", self.value as i64)
        } else {
            format!("{}", self.value)
        };
        format!(
            "# HELP {name} {help}\n# TYPE {name} gauge\n{name} {rendered}",
            name = self.name,
            help = self.help,
        )
    }
}
