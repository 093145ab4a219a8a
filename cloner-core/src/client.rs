//! Backend seam: everything the pipeline asks of the messaging platform.
//!
//! Production code talks to Telegram; tests substitute an in-memory client.

use async_trait::async_trait;

use crate::error::ClientError;
use crate::types::{Conversation, MessageRecord};

/// Operations a messaging backend must provide for a clone run.
///
/// Calls are awaited one at a time; implementations need not support concurrent use.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Opaque media reference carried by fetched messages and handed back to `send_media`.
    type Media: Send + Sync;
    /// Cursor over one conversation's history.
    type History: HistoryStream<Media = Self::Media>;

    /// Most recent dialogs, newest first, at most `limit`.
    async fn recent_dialogs(&self, limit: usize) -> Result<Vec<Conversation>, ClientError>;

    /// Resolves a public username (without the leading `@`).
    async fn resolve_username(&self, username: &str) -> Result<Conversation, ClientError>;

    /// Resolves a raw platform id.
    async fn resolve_id(&self, id: i64) -> Result<Conversation, ClientError>;

    /// Opens a newest-to-oldest history cursor.
    async fn history(&self, chat: &Conversation) -> Result<Self::History, ClientError>;

    async fn send_text(&self, chat: &Conversation, text: &str) -> Result<(), ClientError>;

    /// Sends `media` with `caption` (may be empty).
    async fn send_media(
        &self,
        chat: &Conversation,
        media: &Self::Media,
        caption: &str,
    ) -> Result<(), ClientError>;
}

/// Newest-to-oldest message cursor.
#[async_trait]
pub trait HistoryStream: Send {
    type Media: Send;

    /// Best-effort total message count; `None` when the backend does not say.
    async fn total(&mut self) -> Result<Option<usize>, ClientError>;

    /// Next older message, or `None` at the start of the history.
    async fn next_message(&mut self) -> Result<Option<MessageRecord<Self::Media>>, ClientError>;
}
