//! Development code sender
//!
//! Logs every delivery with the recipient masked and keeps the rendered
//! messages in an outbox. With console output enabled the full message is
//! printed to stdout so codes can be copied during local development.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use nb_core::domain::entities::Channel;
use nb_core::services::verification::{mask_recipient, CodeSender, RenderedMessage};
use nb_shared::config::VerificationConfig;

use crate::InfrastructureError;

/// A message accepted by [`LoggingCodeSender`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredMessage {
    pub message_id: String,
    pub channel: Channel,
    pub recipient: String,
    pub message: RenderedMessage,
}

/// [`CodeSender`] that logs instead of delivering
#[derive(Debug, Default)]
pub struct LoggingCodeSender {
    console_output: bool,
    fail_deliveries: AtomicBool,
    sent: AtomicUsize,
    outbox: Mutex<Vec<DeliveredMessage>>,
}

impl LoggingCodeSender {
    pub fn new(console_output: bool) -> Self {
        Self {
            console_output,
            ..Default::default()
        }
    }

    pub fn from_config(config: &VerificationConfig) -> Self {
        Self::new(config.sender_console_output)
    }

    /// Make subsequent deliveries fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.fail_deliveries.store(failing, Ordering::SeqCst);
    }

    /// Number of messages accepted so far
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    /// Most recent message accepted for `recipient`
    pub async fn last_message_for(&self, recipient: &str) -> Option<DeliveredMessage> {
        self.outbox
            .lock()
            .await
            .iter()
            .rev()
            .find(|m| m.recipient == recipient)
            .cloned()
    }
}

#[async_trait]
impl CodeSender for LoggingCodeSender {
    async fn send_code(
        &self,
        channel: Channel,
        recipient: &str,
        message: &RenderedMessage,
    ) -> Result<String, String> {
        let masked = mask_recipient(channel, recipient);

        if self.fail_deliveries.load(Ordering::SeqCst) {
            warn!(
                channel = %channel,
                recipient = %masked,
                event = "simulated_delivery_failure",
                "Simulated delivery failure"
            );
            return Err(InfrastructureError::Delivery(format!(
                "simulated {} delivery failure",
                channel
            ))
            .to_string());
        }

        let message_id = format!("dev-{}", Uuid::new_v4());

        if self.console_output {
            println!("==== {} to {} ====", channel, recipient);
            if let Some(subject) = &message.subject {
                println!("Subject: {}", subject);
            }
            println!("{}", message.body);
        }

        info!(
            channel = %channel,
            recipient = %masked,
            template = message.template,
            message_id = %message_id,
            event = "code_delivered",
            "Verification message logged"
        );

        self.outbox.lock().await.push(DeliveredMessage {
            message_id: message_id.clone(),
            channel,
            recipient: recipient.to_string(),
            message: message.clone(),
        });
        self.sent.fetch_add(1, Ordering::SeqCst);

        Ok(message_id)
    }
}
