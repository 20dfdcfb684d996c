//! Diary-created notifications over SQS.

use aws_sdk_sqs::error::DisplayErrorContext;
use chrono::NaiveDate;
use fourtoon_core::types::{DbId, MemberId};
use serde::{Deserialize, Serialize};

use crate::error::CloudError;

/// Body of the message published after a diary is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryCreatedMessage {
    pub diary_id: DbId,
    pub member_id: MemberId,
    pub character_id: DbId,
    pub content: String,
    pub diary_date: NaiveDate,
}

/// Publishes diary events to one SQS queue.
#[derive(Clone)]
pub struct DiaryQueuePublisher {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl DiaryQueuePublisher {
    pub fn new(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }

    pub fn from_sdk_config(config: &aws_config::SdkConfig, queue_url: impl Into<String>) -> Self {
        Self::new(aws_sdk_sqs::Client::new(config), queue_url)
    }

    /// Send `message` as JSON. Returns the SQS message id.
    pub async fn publish_diary_created(
        &self,
        message: &DiaryCreatedMessage,
    ) -> Result<Option<String>, CloudError> {
        let body = serde_json::to_string(message)?;
        let output = self
            .client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| CloudError::Sqs(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(
            diary_id = message.diary_id,
            message_id = output.message_id().unwrap_or_default(),
            "Published diary-created message"
        );
        Ok(output.message_id().map(str::to_string))
    }
}
