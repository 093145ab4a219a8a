//! Replicator: replays messages at the destination, oldest first, one send at a time.

use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::client::ChatClient;
use crate::config::FloodWaitPolicy;
use crate::error::ClientError;
use crate::progress::ProgressFactory;
use crate::types::{Conversation, MessageRecord, Payload};

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplicationReport {
    /// Messages looked at (every message in the selection).
    pub processed: usize,
    pub sent: usize,
    /// No media and no text (polls, service messages, ...).
    pub skipped_empty: usize,
    /// Send failed with a non rate-limit error.
    pub failed: usize,
    /// Not delivered because a rate-limit wait consumed it.
    pub dropped_after_wait: usize,
    pub flood_waits: usize,
    pub waited_secs: u64,
}

enum Delivery {
    Sent,
    Skipped,
}

async fn deliver<C: ChatClient>(
    client: &C,
    destination: &Conversation,
    message: &MessageRecord<C::Media>,
) -> Result<Delivery, ClientError> {
    match message.payload() {
        Payload::Media { media, caption } => {
            client.send_media(destination, media, caption).await?;
            Ok(Delivery::Sent)
        }
        Payload::Text(text) => {
            client.send_text(destination, text).await?;
            Ok(Delivery::Sent)
        }
        Payload::Empty => Ok(Delivery::Skipped),
    }
}

/// Sends every message to `destination` in order.
///
/// A rate-limit signal sleeps the full requested duration; `policy` decides whether the same
/// message is sent again afterwards. Any other error is logged with the message id and the loop
/// moves on. Nothing here fails the run.
#[instrument(
    skip(client, destination, messages, progress),
    fields(chat_id = destination.id, count = messages.len())
)]
pub async fn replicate<C: ChatClient>(
    client: &C,
    destination: &Conversation,
    messages: &[MessageRecord<C::Media>],
    policy: FloodWaitPolicy,
    progress: &dyn ProgressFactory,
) -> ReplicationReport {
    let mut report = ReplicationReport::default();
    let mut bar = progress.start("Copying", Some(messages.len() as u64));

    for message in messages {
        let mut retries = 0u32;
        loop {
            match deliver(client, destination, message).await {
                Ok(Delivery::Sent) => {
                    report.sent += 1;
                    break;
                }
                Ok(Delivery::Skipped) => {
                    report.skipped_empty += 1;
                    break;
                }
                Err(ClientError::FloodWait { seconds }) => {
                    report.flood_waits += 1;
                    report.waited_secs += seconds;
                    warn!(
                        message_id = message.id,
                        seconds,
                        "Rate limited, waiting {} seconds",
                        seconds
                    );
                    tokio::time::sleep(Duration::from_secs(seconds)).await;

                    match policy {
                        FloodWaitPolicy::Resend { max_retries } if retries < max_retries => {
                            retries += 1;
                            info!(
                                message_id = message.id,
                                attempt = retries,
                                "Resending after wait"
                            );
                        }
                        _ => {
                            report.dropped_after_wait += 1;
                            warn!(message_id = message.id, "Message not resent after wait");
                            break;
                        }
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        message_id = message.id,
                        error = %e,
                        "Failed to copy message {}",
                        message.id
                    );
                    break;
                }
            }
        }
        report.processed += 1;
        bar.inc(1);
    }

    bar.finish();
    info!(
        sent = report.sent,
        skipped = report.skipped_empty,
        failed = report.failed,
        dropped = report.dropped_after_wait,
        "Replication finished"
    );
    report
}
