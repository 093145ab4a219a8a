//! Core types: conversation handle and message record.

mod conversation;
mod message;

pub use conversation::Conversation;
pub use message::{MessageRecord, Payload};
