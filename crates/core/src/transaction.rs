use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ids::{SegmentId, TransactionId};
use crate::intern::{StrId, StringTable};
use crate::model::metric::{MetricRecord, MetricTable};
use crate::model::segment::Segment;

const MESSAGE_BROKER_PREFIX: &str = "MessageBroker/";
const MESSAGE_BROKER_ROLLUP: &str = "MessageBroker/all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOptions {
    pub message_parameters_enabled: bool,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            message_parameters_enabled: true,
        }
    }
}

/// Owns every segment, metric table, and interned string for one traced
/// unit of work. A transaction is driven by a single logical thread at a
/// time; independent transactions share nothing and may run concurrently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub service: String,
    pub options: TransactionOptions,
    pub unscoped_metrics: MetricTable,
    segments: Vec<Segment>,
    active: Vec<SegmentId>,
    strings: StringTable,
}

impl Transaction {
    pub fn new(config: &Config) -> Self {
        Self {
            id: TransactionId::new(),
            service: config.service_name.clone(),
            options: TransactionOptions {
                message_parameters_enabled: config.message_parameters_enabled,
            },
            unscoped_metrics: MetricTable::new(),
            segments: Vec::new(),
            active: Vec::new(),
            strings: StringTable::new(),
        }
    }

    /// Starts a new, not-yet-finalized segment and pushes it onto the
    /// active stack.
    pub fn start_segment(&mut self) -> SegmentId {
        let id = SegmentId::from_raw(self.segments.len() as u32);
        self.segments.push(Segment::new(Utc::now()));
        self.active.push(id);
        id
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    pub fn segment_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.get_mut(id.index())
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn intern(&mut self, value: &str) -> StrId {
        self.strings.intern(value)
    }

    pub fn string(&self, id: StrId) -> Option<&str> {
        self.strings.get(id)
    }

    /// Resolves a segment's interned name.
    pub fn segment_name(&self, id: SegmentId) -> Option<&str> {
        self.segment(id)
            .and_then(|seg| seg.name)
            .and_then(|name| self.strings.get(name))
    }

    /// Records one unscoped metric against a segment: the record lands on
    /// the segment's local metric list and the transaction's unscoped
    /// table, and `MessageBroker/...` names additionally bump the derived
    /// `MessageBroker/all` and `MessageBroker/<library>/all` rollups.
    pub fn record_segment_metric(&mut self, id: SegmentId, name: &str) -> bool {
        let Some(seg) = self.segments.get_mut(id.index()) else {
            return false;
        };
        let duration = seg.duration();
        seg.metrics.push(MetricRecord {
            name: name.to_string(),
            duration,
            exclusive_duration: duration,
            scoped: false,
        });
        self.unscoped_metrics.record(name, duration);
        if let Some(library) = message_broker_library(name) {
            let library_rollup = format!("{MESSAGE_BROKER_PREFIX}{library}/all");
            self.unscoped_metrics.record(MESSAGE_BROKER_ROLLUP, duration);
            self.unscoped_metrics.record(&library_rollup, duration);
        }
        true
    }

    /// Plain unscoped bump with no segment attached (supportability
    /// metrics and the like).
    pub fn record_unscoped(&mut self, name: &str, duration: std::time::Duration) {
        self.unscoped_metrics.record(name, duration);
    }

    /// Closes a segment: stamps the end time and pops it from the active
    /// stack. Refuses unknown handles and already finalized segments.
    pub fn finalize_segment(&mut self, id: SegmentId) -> bool {
        let Some(seg) = self.segments.get_mut(id.index()) else {
            return false;
        };
        if seg.is_finalized() {
            return false;
        }
        seg.end_ts = Some(Utc::now());
        self.active.retain(|active| *active != id);
        true
    }
}

/// Library token of a `MessageBroker/<library>/...` metric name.
fn message_broker_library(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(MESSAGE_BROKER_PREFIX)?;
    let library = rest.split('/').next().unwrap_or("");
    if library.is_empty() || rest == "all" {
        return None;
    }
    Some(library)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn txn() -> Transaction {
        Transaction::new(&Config::default())
    }

    #[test]
    fn start_segment_pushes_active() {
        let mut txn = txn();
        let id = txn.start_segment();
        assert_eq!(txn.active_count(), 1);
        assert!(!txn.segment(id).unwrap().is_finalized());
    }

    #[test]
    fn finalize_pops_and_refuses_double_close() {
        let mut txn = txn();
        let id = txn.start_segment();
        assert!(txn.finalize_segment(id));
        assert_eq!(txn.active_count(), 0);
        assert!(!txn.finalize_segment(id));
    }

    #[test]
    fn finalize_rejects_unknown_handle() {
        let mut txn = txn();
        assert!(!txn.finalize_segment(SegmentId::from_raw(3)));
    }

    #[test]
    fn segment_metric_bumps_rollups() {
        let mut txn = txn();
        let id = txn.start_segment();
        txn.finalize_segment(id);
        assert!(txn.record_segment_metric(id, "MessageBroker/SQS/Queue/Produce/Named/q"));

        assert_eq!(txn.segment(id).unwrap().metrics.len(), 1);
        assert!(txn
            .unscoped_metrics
            .contains("MessageBroker/SQS/Queue/Produce/Named/q"));
        assert!(txn.unscoped_metrics.contains("MessageBroker/all"));
        assert!(txn.unscoped_metrics.contains("MessageBroker/SQS/all"));
    }

    #[test]
    fn non_broker_metric_gets_no_rollups() {
        let mut txn = txn();
        let id = txn.start_segment();
        assert!(txn.record_segment_metric(id, "Custom/thing"));
        assert!(!txn.unscoped_metrics.contains("MessageBroker/all"));
        assert_eq!(txn.unscoped_metrics.len(), 1);
    }

    #[test]
    fn segment_metric_rejects_unknown_handle() {
        let mut txn = txn();
        assert!(!txn.record_segment_metric(SegmentId::from_raw(0), "MessageBroker/all"));
        assert!(txn.unscoped_metrics.is_empty());
    }

    #[test]
    fn record_unscoped_skips_segments() {
        let mut txn = txn();
        txn.record_unscoped("Supportability/AWS/Services/Sqs", Duration::ZERO);
        assert!(txn
            .unscoped_metrics
            .contains("Supportability/AWS/Services/Sqs"));
    }

    #[test]
    fn segment_name_resolves_through_intern_table() {
        let mut txn = txn();
        let id = txn.start_segment();
        let name = txn.intern("MessageBroker/SQS/Queue/Produce/Named/q");
        txn.segment_mut(id).unwrap().name = Some(name);
        assert_eq!(
            txn.segment_name(id),
            Some("MessageBroker/SQS/Queue/Produce/Named/q")
        );
    }

    #[test]
    fn message_broker_library_extraction() {
        assert_eq!(message_broker_library("MessageBroker/SQS/all"), Some("SQS"));
        assert_eq!(
            message_broker_library("MessageBroker/<unknown>/Topic/Produce/Named/q"),
            Some("<unknown>")
        );
        assert_eq!(message_broker_library("MessageBroker/all"), None);
        assert_eq!(message_broker_library("Custom/thing"), None);
        assert_eq!(message_broker_library("MessageBroker/"), None);
    }

    #[test]
    fn new_transaction_takes_options_from_config() {
        let cfg = Config {
            service_name: "orders".to_string(),
            message_parameters_enabled: false,
        };
        let txn = Transaction::new(&cfg);
        assert_eq!(txn.service, "orders");
        assert!(!txn.options.message_parameters_enabled);
    }
}
