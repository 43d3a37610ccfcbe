//! Fixed keys for the open agent-attribute map.

// Cloud provider
pub const ATTRIBUTE_CLOUD_REGION: &str = "cloud.region";
pub const ATTRIBUTE_CLOUD_ACCOUNT_ID: &str = "cloud.account.id";
pub const ATTRIBUTE_CLOUD_RESOURCE_ID: &str = "cloud.resource_id";

// AWS
pub const ATTRIBUTE_AWS_OPERATION: &str = "aws.operation";
