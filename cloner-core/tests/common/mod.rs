//! In-memory stand-ins for the backend, the terminal and progress output.
//!
//! `FakeClient` records every send so tests can assert on what reached the destination
//! without a network; `ScriptedPrompter` replays canned answers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use cloner_core::{
    ChatClient, ClientError, Conversation, HistoryStream, MessageRecord, Progress,
    ProgressFactory, PromptError, Prompter,
};

/// One send observed at the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Media { chat_id: i64, media: String, caption: String },
}

impl Sent {
    /// Text body or caption.
    pub fn body(&self) -> &str {
        match self {
            Sent::Text { text, .. } => text,
            Sent::Media { caption, .. } => caption,
        }
    }
}

#[derive(Default)]
pub struct FakeClient {
    /// Returned by `recent_dialogs`, truncated to the limit.
    pub dialogs: Vec<Conversation>,
    /// Reachable through `resolve_id` / `resolve_username`.
    pub directory: Vec<Conversation>,
    /// Provider order: newest first.
    pub history: Vec<MessageRecord<String>>,
    /// Make `next_message` fail after yielding this many messages.
    pub history_error_after: Option<usize>,
    pub total: Option<usize>,
    pub total_fails: bool,
    /// Errors to return, in order, for sends whose text/caption matches the key.
    pub failures: Mutex<HashMap<String, VecDeque<ClientError>>>,
    pub sent: Mutex<Vec<Sent>>,
    pub remote_lookups: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: Vec<MessageRecord<String>>) -> Self {
        Self {
            total: Some(history.len()),
            history,
            ..Self::default()
        }
    }

    pub fn fail_send(&self, body: &str, errors: Vec<ClientError>) {
        self.failures
            .lock()
            .unwrap()
            .insert(body.to_string(), errors.into_iter().collect());
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_bodies(&self) -> Vec<String> {
        self.sent().iter().map(|s| s.body().to_string()).collect()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.remote_lookups.lock().unwrap().clone()
    }

    fn next_failure(&self, body: &str) -> Option<ClientError> {
        self.failures
            .lock()
            .unwrap()
            .get_mut(body)
            .and_then(|queue| queue.pop_front())
    }
}

pub struct FakeHistory {
    items: VecDeque<Result<MessageRecord<String>, ClientError>>,
    total: Result<Option<usize>, ClientError>,
}

#[async_trait]
impl HistoryStream for FakeHistory {
    type Media = String;

    async fn total(&mut self) -> Result<Option<usize>, ClientError> {
        self.total.clone()
    }

    async fn next_message(&mut self) -> Result<Option<MessageRecord<String>>, ClientError> {
        match self.items.pop_front() {
            Some(item) => item.map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ChatClient for FakeClient {
    type Media = String;
    type History = FakeHistory;

    async fn recent_dialogs(&self, limit: usize) -> Result<Vec<Conversation>, ClientError> {
        Ok(self.dialogs.iter().take(limit).cloned().collect())
    }

    async fn resolve_username(&self, username: &str) -> Result<Conversation, ClientError> {
        self.remote_lookups
            .lock()
            .unwrap()
            .push(format!("@{}", username));
        self.directory
            .iter()
            .find(|c| c.username.as_deref() == Some(username))
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("@{}", username)))
    }

    async fn resolve_id(&self, id: i64) -> Result<Conversation, ClientError> {
        self.remote_lookups.lock().unwrap().push(id.to_string());
        self.directory
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    async fn history(&self, _chat: &Conversation) -> Result<FakeHistory, ClientError> {
        let mut items: VecDeque<_> = self.history.iter().cloned().map(Ok).collect();
        if let Some(n) = self.history_error_after {
            items.truncate(n);
            items.push_back(Err(ClientError::Other("connection reset".to_string())));
        }
        let total = if self.total_fails {
            Err(ClientError::Other("count unavailable".to_string()))
        } else {
            Ok(self.total)
        };
        Ok(FakeHistory { items, total })
    }

    async fn send_text(&self, chat: &Conversation, text: &str) -> Result<(), ClientError> {
        if let Some(err) = self.next_failure(text) {
            return Err(err);
        }
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        chat: &Conversation,
        media: &String,
        caption: &str,
    ) -> Result<(), ClientError> {
        if let Some(err) = self.next_failure(caption) {
            return Err(err);
        }
        self.sent.lock().unwrap().push(Sent::Media {
            chat_id: chat.id,
            media: media.clone(),
            caption: caption.to_string(),
        });
        Ok(())
    }
}

/// Replays `answers` in order; once they run out every further question is an interrupt.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Result<String, PromptError>>>,
    pub asked: Mutex<Vec<String>>,
    pub said: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| Ok(a.to_string())).collect()),
            ..Self::default()
        }
    }

    pub fn then_interrupt(self) -> Self {
        self.answers
            .lock()
            .unwrap()
            .push_back(Err(PromptError::Interrupted));
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }

    pub fn said(&self) -> Vec<String> {
        self.said.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn ask(&self, prompt: &str) -> Result<String, PromptError> {
        self.asked.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(PromptError::Interrupted))
            .map(|a| a.trim().to_string())
    }

    fn say(&self, line: &str) {
        self.said.lock().unwrap().push(line.to_string());
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    pub label: String,
    pub total: Option<u64>,
    pub done: u64,
    pub finished: bool,
}

/// Records every indicator it hands out.
#[derive(Default, Clone)]
pub struct RecordingProgress {
    pub records: Arc<Mutex<Vec<ProgressRecord>>>,
}

impl RecordingProgress {
    pub fn records(&self) -> Vec<ProgressRecord> {
        self.records.lock().unwrap().clone()
    }
}

struct RecordingBar {
    records: Arc<Mutex<Vec<ProgressRecord>>>,
    index: usize,
}

impl ProgressFactory for RecordingProgress {
    fn start(&self, label: &str, total: Option<u64>) -> Box<dyn Progress> {
        let mut records = self.records.lock().unwrap();
        records.push(ProgressRecord {
            label: label.to_string(),
            total,
            ..ProgressRecord::default()
        });
        Box::new(RecordingBar {
            records: self.records.clone(),
            index: records.len() - 1,
        })
    }
}

impl Progress for RecordingBar {
    fn inc(&mut self, n: u64) {
        self.records.lock().unwrap()[self.index].done += n;
    }

    fn finish(&mut self) {
        self.records.lock().unwrap()[self.index].finished = true;
    }
}

pub fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 9, 30, 0).unwrap()
}

/// Text messages `1..=n`, dated Jan 1..n, in provider order (newest first).
pub fn text_history(n: u32) -> Vec<MessageRecord<String>> {
    (1..=n)
        .rev()
        .map(|i| MessageRecord::text(i as i64, day(i), format!("msg {}", i)))
        .collect()
}

pub fn conv(id: i64, title: &str, username: Option<&str>) -> Conversation {
    Conversation::new(id, Some(title.to_string()), username.map(str::to_string))
}
