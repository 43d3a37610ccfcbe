use serde::{Deserialize, Serialize};
use tracing::debug;

/// Queue URLs longer than this are rejected as malformed.
pub const QUEUE_URL_MAX_LEN: usize = 512;

const SCHEME_PREFIX: &str = "https://sqs.";
const DOMAIN_SUFFIX: &str = ".amazonaws.com";

/// Structured identifiers extracted from an SQS queue URL. All three fields
/// are always present: extraction is all-or-nothing, since a malformed URL
/// cannot reliably yield a subset of correct fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueUrl {
    pub region: String,
    pub account_id: String,
    pub queue_name: String,
}

/// Parses `https://sqs.<region>.amazonaws.com/<account-id>/<queue-name>`.
/// Returns `None` for anything else; callers treat that as a normal outcome
/// and fall back to empty cloud attributes.
pub fn parse(url: &str) -> Option<QueueUrl> {
    if url.len() > QUEUE_URL_MAX_LEN {
        debug!(len = url.len(), "queue url over length limit");
        return None;
    }

    let rest = url.strip_prefix(SCHEME_PREFIX)?;
    let (host, path) = rest.split_once('/')?;
    let region = host.strip_suffix(DOMAIN_SUFFIX)?;
    let (account_id, queue_name) = path.split_once('/')?;

    if region.is_empty() || account_id.is_empty() || queue_name.is_empty() {
        return None;
    }

    Some(QueueUrl {
        region: region.to_string(),
        account_id: account_id.to_string(),
        queue_name: queue_name.to_string(),
    })
}
