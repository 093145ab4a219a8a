//! Telegram backend for the cloner: a [`cloner_core::ChatClient`] over the MTProto user API.
//!
//! [`TelegramSession`] owns the connection and the on-disk session file; [`TelegramClient`]
//! adapts it to the core traits.

mod adapter;
mod error;
mod session;

pub use adapter::{TelegramClient, TelegramHistory};
pub use error::map_invocation_error;
pub use session::TelegramSession;
