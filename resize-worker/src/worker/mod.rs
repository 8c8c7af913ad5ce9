pub mod config;
pub mod generator;
pub mod resize;

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sqs::Client as SqsClient;
use media_storage::event_queue::{EventQueue, RawMessage};
use media_storage::object_store::{S3MediaStore, DEFAULT_PRESIGN_EXPIRY_SECS};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::types::environment::Environment;
use crate::types::event::S3Event;

use self::config::ResizeConfig;
use self::generator::DerivativeGenerator;

/// Delay before polling again after a queue error
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Worker that turns bucket creation events into resized derivatives
///
/// Polls the creation-event queue and hands each notification batch to the
/// derivative generator. Messages within a poll are processed strictly in
/// sequence; a message is acknowledged only after its whole batch succeeded,
/// so failed invocations are redelivered by the queue.
pub struct ResizeWorker {
    queue: EventQueue,
    generator: DerivativeGenerator<S3MediaStore>,
    shutdown_token: CancellationToken,
}

impl ResizeWorker {
    /// Creates a new resize worker from the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if AWS client configuration fails
    pub async fn new(env: Environment) -> anyhow::Result<Self> {
        let s3_client = Arc::new(S3Client::from_conf(env.s3_client_config().await));
        let store = S3MediaStore::new(s3_client, env.s3_bucket(), DEFAULT_PRESIGN_EXPIRY_SECS);

        let sqs_client = Arc::new(SqsClient::from_conf(env.sqs_client_config().await));
        let queue = EventQueue::new(sqs_client, env.queue_config());

        let generator = DerivativeGenerator::new(ResizeConfig::from_environment(&env), store);

        Ok(Self {
            queue,
            generator,
            shutdown_token: CancellationToken::new(),
        })
    }

    /// Returns a clone of the shutdown token for external control
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Runs the poll loop until shutdown is requested
    ///
    /// # Errors
    ///
    /// Currently always returns `Ok`; the signature leaves room for startup
    /// validation failures.
    pub async fn start(self) -> anyhow::Result<()> {
        info!("Starting resize worker");

        loop {
            tokio::select! {
                () = self.shutdown_token.cancelled() => {
                    info!("Resize worker received shutdown signal");
                    break;
                }
                result = self.queue.poll_messages() => {
                    match result {
                        Ok(messages) => self.handle_messages(messages).await,
                        Err(e) => {
                            error!("Failed to poll creation events: {e}");
                            tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                        }
                    }
                }
            }
        }

        info!("Resize worker stopped");
        Ok(())
    }

    async fn handle_messages(&self, messages: Vec<RawMessage>) {
        for message in messages {
            if let Err(e) = self.handle_message(&message).await {
                // Left un-acked; the queue redelivers after the visibility
                // timeout expires
                error!("Failed to process creation event {}: {e}", message.message_id);
            }
        }
    }

    async fn handle_message(&self, message: &RawMessage) -> anyhow::Result<()> {
        let event: S3Event = serde_json::from_str(&message.body)?;

        self.generator.process_event(&event).await?;
        self.queue.ack_message(&message.receipt_handle).await?;

        Ok(())
    }
}
