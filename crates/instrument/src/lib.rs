pub mod message;
pub mod queueurl;
pub mod sqs;

pub use message::{CloudAttrs, DestinationType, MessageAction, MessageParams};
pub use queueurl::QueueUrl;
