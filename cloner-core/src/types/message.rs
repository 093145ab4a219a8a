//! Message snapshot taken from the source conversation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A read-only copy of one source message.
///
/// `M` is the client's media reference; the core never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord<M> {
    pub id: i64,
    pub date: Option<DateTime<Utc>>,
    pub text: Option<String>,
    pub media: Option<M>,
}

/// What the destination should receive for one message.
#[derive(Debug, PartialEq)]
pub enum Payload<'a, M> {
    Media { media: &'a M, caption: &'a str },
    Text(&'a str),
    Empty,
}

impl<M> MessageRecord<M> {
    pub fn text(id: i64, date: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            id,
            date: Some(date),
            text: Some(text.into()),
            media: None,
        }
    }

    /// UTC calendar day of the message, if it has a date.
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.map(|d| d.date_naive())
    }

    /// Media wins over text; an empty text body counts as no text.
    pub fn payload(&self) -> Payload<'_, M> {
        let text = self.text.as_deref().unwrap_or("");
        match &self.media {
            Some(media) => Payload::Media {
                media,
                caption: text,
            },
            None if !text.is_empty() => Payload::Text(text),
            None => Payload::Empty,
        }
    }
}
