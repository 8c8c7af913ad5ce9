//! Creation-event queue operations
//!
//! The media bucket publishes object-creation notifications to an SQS queue;
//! this module provides the polling client the resize worker consumes them
//! through. Message bodies are returned raw: payload parsing is the caller's
//! responsibility, so a malformed notification fails the invocation instead
//! of being dropped at the transport layer.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

mod error;

use std::sync::Arc;

use aws_sdk_sqs::Client as SqsClient;

pub use error::{QueueError, QueueResult};

/// Configuration for queue operations
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Queue URL
    pub queue_url: String,
    /// Maximum number of messages to retrieve per poll
    pub max_messages: i32,
    /// Visibility timeout for received messages (in seconds)
    pub visibility_timeout: i32,
    /// Wait time for long polling (in seconds)
    pub wait_time_seconds: i32,
}

/// A raw queue message with its delivery metadata
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// The unparsed message body
    pub body: String,
    /// Receipt handle for acknowledging the message
    pub receipt_handle: String,
    /// Message ID
    pub message_id: String,
}

/// SQS queue client for bucket creation events
pub struct EventQueue {
    sqs_client: Arc<SqsClient>,
    config: QueueConfig,
}

impl EventQueue {
    /// Creates a new event queue client
    ///
    /// # Arguments
    ///
    /// * `sqs_client` - Pre-configured SQS client
    /// * `config` - Queue configuration including URL and polling parameters
    #[must_use]
    pub const fn new(sqs_client: Arc<SqsClient>, config: QueueConfig) -> Self {
        Self { sqs_client, config }
    }

    /// Polls messages from the queue
    ///
    /// # Returns
    ///
    /// A vector of raw messages with metadata
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the poll operation fails
    pub async fn poll_messages(&self) -> QueueResult<Vec<RawMessage>> {
        let result = self
            .sqs_client
            .receive_message()
            .queue_url(&self.config.queue_url)
            .max_number_of_messages(self.config.max_messages)
            .visibility_timeout(self.config.visibility_timeout)
            .wait_time_seconds(self.config.wait_time_seconds)
            .send()
            .await?;

        let messages = result
            .messages()
            .iter()
            .filter_map(|msg| {
                Some(RawMessage {
                    body: msg.body()?.to_string(),
                    receipt_handle: msg.receipt_handle()?.to_string(),
                    message_id: msg.message_id()?.to_string(),
                })
            })
            .collect();

        Ok(messages)
    }

    /// Acknowledges receipt of a message by deleting it from the queue
    ///
    /// # Arguments
    ///
    /// * `receipt_handle` - The receipt handle from the received message
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the acknowledgment fails
    pub async fn ack_message(&self, receipt_handle: &str) -> QueueResult<()> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.config.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}
