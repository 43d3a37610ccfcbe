use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One metric observation attached to a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: String,
    pub duration: Duration,
    pub exclusive_duration: Duration,
    pub scoped: bool,
}

/// Aggregated view of every observation recorded under one name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricAggregate {
    pub count: u64,
    pub total: Duration,
    pub exclusive: Duration,
}

/// Name -> aggregate table. Repeated names sum; callers never need to
/// enforce uniqueness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricTable {
    metrics: BTreeMap<String, MetricAggregate>,
}

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str, duration: Duration) {
        self.record_with_exclusive(name, duration, duration);
    }

    pub fn record_with_exclusive(&mut self, name: &str, duration: Duration, exclusive: Duration) {
        let entry = self.metrics.entry(name.to_string()).or_default();
        entry.count += 1;
        entry.total += duration;
        entry.exclusive += exclusive;
    }

    pub fn get(&self, name: &str) -> Option<&MetricAggregate> {
        self.metrics.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.metrics.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }
}
