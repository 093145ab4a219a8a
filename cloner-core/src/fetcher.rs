//! History fetcher: drains the source history newest-to-oldest and returns it oldest-first.

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::client::{ChatClient, HistoryStream};
use crate::error::{CloneError, Result};
use crate::progress::{Progress, ProgressFactory};
use crate::types::{Conversation, MessageRecord};

/// Fetches the history of `source`, stopping at the first message older than `start_date`.
///
/// History arrives strictly newest-first, so one message before `start_date` means the rest
/// are older too. With a start date, undated messages are counted but not kept. Any backend
/// error aborts the fetch after the progress indicator is finished.
///
/// The returned buffer is oldest-first.
#[instrument(skip(client, source, progress), fields(chat_id = source.id))]
pub async fn fetch_history<C: ChatClient>(
    client: &C,
    source: &Conversation,
    start_date: Option<NaiveDate>,
    progress: &dyn ProgressFactory,
) -> Result<Vec<MessageRecord<C::Media>>> {
    let mut history = client.history(source).await.map_err(CloneError::Fetch)?;

    let total = match history.total().await {
        Ok(total) => total,
        Err(e) => {
            debug!(error = %e, "History total unavailable");
            None
        }
    };

    let mut bar = progress.start("Fetching", total.map(|t| t as u64));
    let drained = drain(&mut history, start_date, bar.as_mut()).await;
    bar.finish();

    let mut messages = match drained {
        Ok(messages) => messages,
        Err(e) => {
            warn!(error = %e, "History fetch aborted");
            return Err(CloneError::Fetch(e));
        }
    };
    messages.reverse();

    match start_date {
        Some(date) => {
            info!(count = messages.len(), since = %date, "Fetched messages since {}", date)
        }
        None => info!(count = messages.len(), "Fetched messages"),
    }
    Ok(messages)
}

async fn drain<H: HistoryStream>(
    history: &mut H,
    start_date: Option<NaiveDate>,
    bar: &mut dyn Progress,
) -> std::result::Result<Vec<MessageRecord<H::Media>>, crate::error::ClientError> {
    let mut messages = Vec::new();
    while let Some(message) = history.next_message().await? {
        if let Some(start) = start_date {
            match message.day() {
                None => {
                    bar.inc(1);
                    continue;
                }
                Some(day) if day < start => break,
                Some(_) => {}
            }
        }
        messages.push(message);
        bar.inc(1);
    }
    Ok(messages)
}
