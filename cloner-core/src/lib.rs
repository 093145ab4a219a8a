//! # Conversation cloner core
//!
//! Transport-agnostic pipeline that copies message history from one conversation to another:
//! resolve source and destination, fetch history (optionally from a start date), pick the
//! oldest N messages and replay them at the destination one at a time.
//!
//! The backend is reached only through [`ChatClient`]; the operator only through [`Prompter`].

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logger;
pub mod progress;
pub mod prompt;
pub mod replicator;
pub mod resolver;
pub mod run;
pub mod selection;
pub mod types;

pub use client::{ChatClient, HistoryStream};
pub use config::{CloneConfig, CopyCount, FloodWaitPolicy, RawConfig, RunMode, StartDate};
pub use error::{ClientError, CloneError, PromptError, Result};
pub use fetcher::fetch_history;
pub use logger::init_tracing;
pub use progress::{LogProgressFactory, Progress, ProgressFactory};
pub use prompt::Prompter;
pub use replicator::{replicate, ReplicationReport};
pub use resolver::{choose_conversation, resolve_selector, Selector};
pub use run::{run_clone, CancelReason, RunOutcome, RunState, RunTracker};
pub use selection::{parse_copy_count, prompt_copy_count, select_oldest, CountChoice};
pub use types::{Conversation, MessageRecord, Payload};
