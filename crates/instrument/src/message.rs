use serde::{Deserialize, Serialize};
use tracing::debug;

use traceq_core::ids::SegmentId;
use traceq_core::model::segment::SegmentKind;
use traceq_core::semconv;
use traceq_core::transaction::Transaction;

const MESSAGE_BROKER_PREFIX: &str = "MessageBroker";
const UNKNOWN_TOKEN: &str = "<unknown>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageAction {
    Producer,
    Consumer,
    Client,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DestinationType {
    Exchange,
    Topic,
    #[default]
    Queue,
    TempTopic,
    TempQueue,
}

impl DestinationType {
    fn is_temp(self) -> bool {
        matches!(self, Self::TempTopic | Self::TempQueue)
    }

    /// Name token; temporary variants collapse into their permanent
    /// counterpart (the `Temp` suffix keeps them distinguishable).
    fn token(self) -> &'static str {
        match self {
            Self::Exchange => "Exchange",
            Self::Topic | Self::TempTopic => "Topic",
            Self::Queue | Self::TempQueue => "Queue",
        }
    }
}

/// Caller-owned description of one message-broker operation. Empty strings
/// are treated the same as `None` everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageParams {
    pub library: Option<String>,
    pub action: MessageAction,
    pub destination_type: DestinationType,
    pub destination_name: Option<String>,
    pub messaging_system: Option<String>,
    pub server_address: Option<String>,
    pub messaging_destination_publish_name: Option<String>,
    pub messaging_destination_routing_key: Option<String>,
    /// 0 means no port was configured.
    pub server_port: u64,
}

/// Cloud-provider metadata for the operation, typically assembled from a
/// parsed queue URL plus the provider command name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudAttrs {
    pub cloud_region: Option<String>,
    pub cloud_account_id: Option<String>,
    pub cloud_resource_id: Option<String>,
    pub aws_operation: Option<String>,
}

/// Ends `id` as a message segment: writes cloud agent attributes
/// (unconditionally), derives and assigns the segment name, records exactly
/// one metric (plus the transaction-derived rollups), populates the typed
/// message attributes when `attrs_enabled`, and finalizes the segment.
///
/// Returns `false` without touching the segment when the handle is unknown
/// or the segment was already finalized.
pub fn end(
    txn: &mut Transaction,
    id: SegmentId,
    params: &MessageParams,
    cloud: &CloudAttrs,
    attrs_enabled: bool,
) -> bool {
    match txn.segment(id) {
        Some(seg) if !seg.is_finalized() => {}
        _ => {
            debug!(segment = id.as_u32(), "message segment end rejected");
            return false;
        }
    }

    let name = derive_name(params);
    let name_id = txn.intern(&name);

    let Some(seg) = txn.segment_mut(id) else {
        return false;
    };

    let cloud_attributes = [
        (semconv::ATTRIBUTE_CLOUD_REGION, &cloud.cloud_region),
        (semconv::ATTRIBUTE_CLOUD_ACCOUNT_ID, &cloud.cloud_account_id),
        (semconv::ATTRIBUTE_CLOUD_RESOURCE_ID, &cloud.cloud_resource_id),
        (semconv::ATTRIBUTE_AWS_OPERATION, &cloud.aws_operation),
    ];
    for (key, value) in cloud_attributes {
        if let Some(value) = non_empty(value.as_deref()) {
            seg.set_agent_attribute(key, value);
        }
    }

    seg.kind = SegmentKind::Message;
    seg.name = Some(name_id);

    if attrs_enabled {
        seg.message.destination_name = non_empty(params.destination_name.as_deref())
            .or_else(|| non_empty(params.messaging_destination_publish_name.as_deref()))
            .map(str::to_string);
        seg.message.messaging_system =
            non_empty(params.messaging_system.as_deref()).map(str::to_string);
        seg.message.server_address =
            non_empty(params.server_address.as_deref()).map(str::to_string);
        seg.message.messaging_destination_publish_name =
            non_empty(params.messaging_destination_publish_name.as_deref()).map(str::to_string);
        seg.message.messaging_destination_routing_key =
            non_empty(params.messaging_destination_routing_key.as_deref()).map(str::to_string);
        seg.message.server_port = params.server_port;
    }

    txn.finalize_segment(id);
    txn.record_segment_metric(id, &name);
    true
}

/// Derives the taxonomy name for a message operation:
/// `MessageBroker/<library>/<type>/<action>/<Temp | Named/<destination>>`,
/// with `<unknown>` standing in for missing pieces.
pub fn derive_name(params: &MessageParams) -> String {
    let library = non_empty(params.library.as_deref()).unwrap_or(UNKNOWN_TOKEN);
    let action = match params.action {
        MessageAction::Producer => "Produce",
        MessageAction::Consumer => "Consume",
        _ => UNKNOWN_TOKEN,
    };
    let type_token = params.destination_type.token();

    let mut name = format!("{MESSAGE_BROKER_PREFIX}/{library}/{type_token}/{action}/");
    if params.destination_type.is_temp() {
        name.push_str("Temp");
    } else {
        name.push_str("Named/");
        name.push_str(effective_destination(params).unwrap_or(UNKNOWN_TOKEN));
    }
    name
}

/// Destination used for naming: the publish name wins over the plain
/// destination name when both are present.
fn effective_destination(params: &MessageParams) -> Option<&str> {
    non_empty(params.messaging_destination_publish_name.as_deref())
        .or_else(|| non_empty(params.destination_name.as_deref()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
