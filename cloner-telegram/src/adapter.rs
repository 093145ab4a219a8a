//! Wraps the grammers [`Client`] and implements [`ChatClient`].
//!
//! Telegram needs the full chat object (with access hash) to address a conversation, so every
//! chat seen through a listing or lookup is remembered by id.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use grammers_client::types::{Chat, Media, Message};
use grammers_client::{Client, InputMessage, InvocationError};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use cloner_core::{ChatClient, ClientError, Conversation, HistoryStream, MessageRecord};

use crate::error::map_invocation_error;

pub struct TelegramClient {
    client: Client,
    chats: Mutex<HashMap<i64, Chat>>,
}

impl TelegramClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            chats: Mutex::new(HashMap::new()),
        }
    }

    fn remember(&self, chat: &Chat) -> Conversation {
        if let Ok(mut chats) = self.chats.lock() {
            chats.insert(chat.id(), chat.clone());
        }
        to_conversation(chat)
    }

    fn known(&self, id: i64) -> Option<Chat> {
        self.chats.lock().ok().and_then(|chats| chats.get(&id).cloned())
    }

    fn chat(&self, conv: &Conversation) -> Result<Chat, ClientError> {
        self.known(conv.id).ok_or_else(|| {
            ClientError::NotFound(format!("conversation {} was never resolved", conv.id))
        })
    }
}

fn to_conversation(chat: &Chat) -> Conversation {
    Conversation::new(
        chat.id(),
        Some(chat.name().to_string()),
        chat.username().map(str::to_string),
    )
}

/// Web page previews travel with the text; polls cannot be re-sent as media.
fn copyable(media: &Media) -> bool {
    !matches!(media, Media::WebPage(_) | Media::Poll(_))
}

fn to_record(msg: &Message) -> MessageRecord<Media> {
    let text = msg.text();
    MessageRecord {
        id: i64::from(msg.id()),
        date: Some(msg.date()),
        text: (!text.is_empty()).then(|| text.to_string()),
        media: msg.media().filter(copyable),
    }
}

#[async_trait]
impl ChatClient for TelegramClient {
    type Media = Media;
    type History = TelegramHistory;

    async fn recent_dialogs(&self, limit: usize) -> Result<Vec<Conversation>, ClientError> {
        let mut dialogs = self.client.iter_dialogs();
        let mut listing = Vec::new();
        while listing.len() < limit {
            match dialogs.next().await.map_err(map_invocation_error)? {
                Some(dialog) => listing.push(self.remember(dialog.chat())),
                None => break,
            }
        }
        debug!(count = listing.len(), "Listed dialogs");
        Ok(listing)
    }

    async fn resolve_username(&self, username: &str) -> Result<Conversation, ClientError> {
        match self
            .client
            .resolve_username(username)
            .await
            .map_err(map_invocation_error)?
        {
            Some(chat) => Ok(self.remember(&chat)),
            None => Err(ClientError::NotFound(format!("@{}", username))),
        }
    }

    /// Bare ids carry no access hash, so unknown ids are looked up across all dialogs.
    async fn resolve_id(&self, id: i64) -> Result<Conversation, ClientError> {
        let cached = self
            .chats
            .lock()
            .ok()
            .and_then(|chats| chats.values().find(|c| id_matches(c.id(), id)).cloned());
        if let Some(chat) = cached {
            return Ok(to_conversation(&chat));
        }
        let mut dialogs = self.client.iter_dialogs();
        while let Some(dialog) = dialogs.next().await.map_err(map_invocation_error)? {
            let chat = dialog.chat();
            if id_matches(chat.id(), id) {
                return Ok(self.remember(chat));
            }
        }
        Err(ClientError::NotFound(format!(
            "id {} is not among your dialogs",
            id
        )))
    }

    async fn history(&self, conv: &Conversation) -> Result<TelegramHistory, ClientError> {
        let chat = self.chat(conv)?;
        let mut iter = self.client.iter_messages(chat.pack());
        let total = iter.total().await.map(Some).map_err(map_invocation_error);
        let messages = stream::unfold(iter, |mut iter| async move {
            match iter.next().await {
                Ok(Some(message)) => Some((Ok(message), iter)),
                Ok(None) => None,
                Err(e) => Some((Err(e), iter)),
            }
        })
        .boxed();
        Ok(TelegramHistory {
            total: Some(total),
            messages,
        })
    }

    async fn send_text(&self, conv: &Conversation, text: &str) -> Result<(), ClientError> {
        let chat = self.chat(conv)?;
        self.client
            .send_message(chat.pack(), InputMessage::text(text))
            .await
            .map_err(map_invocation_error)?;
        Ok(())
    }

    async fn send_media(
        &self,
        conv: &Conversation,
        media: &Media,
        caption: &str,
    ) -> Result<(), ClientError> {
        let chat = self.chat(conv)?;
        self.client
            .send_message(chat.pack(), InputMessage::text(caption).copy_media(media))
            .await
            .map_err(map_invocation_error)?;
        Ok(())
    }
}

/// Accepts the bare id as well as Bot-API style marked ids (`-id` for basic groups,
/// `-100…` for channels and supergroups).
fn id_matches(bare: i64, id: i64) -> bool {
    id == bare || id == -bare || id == -1_000_000_000_000 - bare
}

/// Newest-first cursor over one chat. The total is queried once when the cursor is opened.
pub struct TelegramHistory {
    total: Option<Result<Option<usize>, ClientError>>,
    messages: BoxStream<'static, Result<Message, InvocationError>>,
}

#[async_trait]
impl HistoryStream for TelegramHistory {
    type Media = Media;

    async fn total(&mut self) -> Result<Option<usize>, ClientError> {
        self.total.take().unwrap_or(Ok(None))
    }

    async fn next_message(&mut self) -> Result<Option<MessageRecord<Media>>, ClientError> {
        match self.messages.next().await {
            Some(Ok(message)) => Ok(Some(to_record(&message))),
            Some(Err(e)) => Err(map_invocation_error(e)),
            None => Ok(None),
        }
    }
}
