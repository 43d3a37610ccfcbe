use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intern::StrId;
use crate::model::metric::MetricRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SegmentKind {
    #[default]
    Custom,
    Message,
}

/// Typed attributes specific to message segments, distinct from the open
/// agent-attribute map. Population is gated by the transaction's
/// `message_parameters_enabled` option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageAttributes {
    pub destination_name: Option<String>,
    pub messaging_system: Option<String>,
    pub server_address: Option<String>,
    pub messaging_destination_publish_name: Option<String>,
    pub messaging_destination_routing_key: Option<String>,
    /// 0 means no port was configured.
    pub server_port: u64,
}

/// One timed node in a transaction's execution trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Interned name, assigned exactly once at finalize time.
    pub name: Option<StrId>,
    pub start_ts: DateTime<Utc>,
    pub end_ts: Option<DateTime<Utc>>,
    pub agent_attributes: BTreeMap<String, String>,
    pub message: MessageAttributes,
    pub metrics: Vec<MetricRecord>,
}

impl Segment {
    pub fn new(start_ts: DateTime<Utc>) -> Self {
        Self {
            kind: SegmentKind::Custom,
            name: None,
            start_ts,
            end_ts: None,
            agent_attributes: BTreeMap::new(),
            message: MessageAttributes::default(),
            metrics: Vec::new(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.end_ts.is_some()
    }

    /// Wall-clock duration; zero until the segment is finalized.
    pub fn duration(&self) -> Duration {
        match self.end_ts {
            Some(end) => (end - self.start_ts).to_std().unwrap_or(Duration::ZERO),
            None => Duration::ZERO,
        }
    }

    pub fn set_agent_attribute(&mut self, key: &str, value: &str) {
        self.agent_attributes
            .insert(key.to_string(), value.to_string());
    }

    pub fn agent_attribute(&self, key: &str) -> Option<&str> {
        self.agent_attributes.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fresh_segment_is_open_and_unnamed() {
        let seg = Segment::new(Utc::now());
        assert_eq!(seg.kind, SegmentKind::Custom);
        assert!(seg.name.is_none());
        assert!(!seg.is_finalized());
        assert_eq!(seg.duration(), Duration::ZERO);
        assert!(seg.metrics.is_empty());
    }

    #[test]
    fn duration_is_end_minus_start() {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let mut seg = Segment::new(start);
        seg.end_ts = Some(start + chrono::Duration::milliseconds(250));
        assert!(seg.is_finalized());
        assert_eq!(seg.duration(), Duration::from_millis(250));
    }

    #[test]
    fn serializes_with_open_attribute_map() {
        let mut seg = Segment::new(Utc::now());
        seg.set_agent_attribute("cloud.region", "us-east-2");
        seg.message.server_port = 1234;

        let json = serde_json::to_value(&seg).unwrap();
        assert_eq!(json["kind"], "Custom");
        assert_eq!(json["agent_attributes"]["cloud.region"], "us-east-2");
        assert_eq!(json["message"]["server_port"], 1234);
        assert!(json["end_ts"].is_null());
    }

    #[test]
    fn agent_attributes_read_back() {
        let mut seg = Segment::new(Utc::now());
        seg.set_agent_attribute("cloud.region", "us-east-2");
        assert_eq!(seg.agent_attribute("cloud.region"), Some("us-east-2"));
        assert_eq!(seg.agent_attribute("cloud.account.id"), None);
    }
}
