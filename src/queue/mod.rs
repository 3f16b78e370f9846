//! Scan-job dispatch onto the work queue.
//!
//! [`ScanQueue`] is the async trait for submitting one serialized message.
//! [`SqsScanQueue`] implements it against AWS SQS. [`enqueue_scan_job`]
//! serializes a [`ScanJob`] and reports acceptance as a boolean.

mod sqs;

pub use sqs::SqsScanQueue;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One organization/service scan request, serialized verbatim as the queue
/// message body. The consumer expects exactly this field set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanJob {
    pub service: String,
    pub org: String,
    pub page: u32,
    pub default_branch_only: bool,
    pub plugins: Vec<String>,
    pub batch_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum QueueSendError {
    /// The queue service reported an error for the submission. Recoverable;
    /// the caller decides whether to retry or drop the job.
    #[error("queue rejected the message: {message}")]
    Rejected { message: String },
    /// The request never produced a queue response. Outside the classified
    /// set, so it propagates.
    #[error("queue request failed")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Submits one message body to a named queue, no internal retry.
#[async_trait::async_trait]
pub trait ScanQueue: Send + Sync {
    async fn send(&self, queue_url: &str, body: String) -> Result<(), QueueSendError>;
}

/// Serializes `job` and submits it to the queue at `queue_url`.
///
/// Returns `Ok(true)` on acceptance and `Ok(false)` when the queue service
/// rejects the submission (logged, not propagated). Failures outside the
/// queue service's classified errors propagate as `Err`.
pub async fn enqueue_scan_job<Q: ScanQueue>(
    queue: &Q,
    queue_url: &str,
    job: &ScanJob,
) -> Result<bool> {
    let body = serde_json::to_string(job)?;
    match queue.send(queue_url, body).await {
        Ok(()) => {
            info!(service = %job.service, org = %job.org, "queued for scanning");
            Ok(true)
        }
        Err(QueueSendError::Rejected { message }) => {
            warn!(
                service = %job.service,
                org = %job.org,
                error = %message,
                "unable to queue org"
            );
            Ok(false)
        }
        Err(err @ QueueSendError::Request(_)) => Err(err.into()),
    }
}
