use tracing_subscriber::EnvFilter;

use traceq_core::config::Config;
use traceq_core::transaction::Transaction;
use traceq_instrument::message::{CloudAttrs, DestinationType, MessageAction, MessageParams};

/// Fresh transaction with message-detail attributes enabled.
pub fn test_transaction() -> Transaction {
    Transaction::new(&Config {
        service_name: "testapp".to_string(),
        message_parameters_enabled: true,
    })
}

pub fn producer_params(
    library: &str,
    destination_type: DestinationType,
    destination_name: &str,
) -> MessageParams {
    MessageParams {
        library: Some(library.to_string()),
        action: MessageAction::Producer,
        destination_type,
        destination_name: Some(destination_name.to_string()),
        ..MessageParams::default()
    }
}

/// Cloud attributes with every field populated.
pub fn full_cloud_attrs() -> CloudAttrs {
    CloudAttrs {
        cloud_region: Some("wild-west-1".to_string()),
        cloud_account_id: Some("12345678".to_string()),
        cloud_resource_id: Some("my_resource_id".to_string()),
        aws_operation: Some("sendMessage".to_string()),
    }
}

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
