//! SQS command instrumentation: maps provider commands onto message
//! params and cloud attributes, independent of how the command was
//! intercepted.

use crate::message::{CloudAttrs, DestinationType, MessageAction, MessageParams};
use crate::queueurl;

pub const SQS_LIBRARY: &str = "SQS";
pub const SQS_MESSAGING_SYSTEM: &str = "aws_sqs";

pub const SEND_MESSAGE_COMMAND: &str = "sendMessage";
pub const SEND_MESSAGE_BATCH_COMMAND: &str = "sendMessageBatch";
pub const RECEIVE_MESSAGE_COMMAND: &str = "receiveMessage";

const SUPPORTABILITY_SERVICE_PREFIX: &str = "Supportability/AWS/Services/";
const MAX_METRIC_NAME_LEN: usize = 256;

/// Message action for an SQS command; `None` means the command is not
/// instrumented as a message operation.
pub fn action_for_command(command: &str) -> Option<MessageAction> {
    match command {
        SEND_MESSAGE_COMMAND | SEND_MESSAGE_BATCH_COMMAND => Some(MessageAction::Producer),
        RECEIVE_MESSAGE_COMMAND => Some(MessageAction::Consumer),
        _ => None,
    }
}

/// Builds the segment inputs for an instrumented SQS command. A missing or
/// malformed queue URL degrades to empty cloud attributes and no
/// destination name rather than failing the call.
pub fn command_params(command: &str, queue_url: Option<&str>) -> Option<(MessageParams, CloudAttrs)> {
    let action = action_for_command(command)?;

    let mut params = MessageParams {
        library: Some(SQS_LIBRARY.to_string()),
        action,
        destination_type: DestinationType::Queue,
        messaging_system: Some(SQS_MESSAGING_SYSTEM.to_string()),
        ..MessageParams::default()
    };
    let mut cloud = CloudAttrs {
        aws_operation: Some(command.to_string()),
        ..CloudAttrs::default()
    };

    if let Some(parsed) = queue_url.and_then(queueurl::parse) {
        cloud.cloud_resource_id = Some(format!(
            "arn:aws:sqs:{}:{}:{}",
            parsed.region, parsed.account_id, parsed.queue_name
        ));
        cloud.cloud_region = Some(parsed.region);
        cloud.cloud_account_id = Some(parsed.account_id);
        params.destination_name = Some(parsed.queue_name);
    }

    Some((params, cloud))
}

/// Supportability rollup name for a detected AWS service. `None` when the
/// service name would push the metric past the name-length limit.
pub fn supportability_metric_name(service: &str) -> Option<String> {
    if service.is_empty()
        || SUPPORTABILITY_SERVICE_PREFIX.len() + service.len() > MAX_METRIC_NAME_LEN
    {
        return None;
    }
    Some(format!("{SUPPORTABILITY_SERVICE_PREFIX}{service}"))
}
