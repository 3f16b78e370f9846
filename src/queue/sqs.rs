use aws_sdk_sqs::error::DisplayErrorContext;

use super::{QueueSendError, ScanQueue};

/// Submits scan jobs to AWS SQS.
pub struct SqsScanQueue {
    client: aws_sdk_sqs::Client,
}

impl SqsScanQueue {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sqs::Client::new(config),
        }
    }
}

#[async_trait::async_trait]
impl ScanQueue for SqsScanQueue {
    async fn send(&self, queue_url: &str, body: String) -> Result<(), QueueSendError> {
        let result = self
            .client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            // Service-reported errors are the classified, recoverable set.
            Err(err) if err.as_service_error().is_some() => Err(QueueSendError::Rejected {
                message: DisplayErrorContext(&err).to_string(),
            }),
            Err(err) => Err(QueueSendError::Request(Box::new(err))),
        }
    }
}
