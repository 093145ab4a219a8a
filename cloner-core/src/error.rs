//! Error types for the cloner.
//!
//! [`CloneError`] is the top-level error; [`ClientError`] is what a [`crate::ChatClient`]
//! reports; [`PromptError`] comes from the operator's terminal.

use thiserror::Error;

use crate::run::RunState;

/// Top-level error for a clone run (config, resolution, fetch, prompt, session, IO).
#[derive(Error, Debug)]
pub enum CloneError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Could not resolve conversation {selector}: {source}")]
    Resolution {
        selector: String,
        #[source]
        source: ClientError,
    },

    #[error("Failed to fetch history: {0}")]
    Fetch(#[source] ClientError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid run transition {from:?} -> {to:?}")]
    InvalidTransition { from: RunState, to: RunState },
}

/// Errors reported by the messaging backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Backend asked us to pause before any further request.
    #[error("rate limited, must wait {seconds} seconds")]
    FloodWait { seconds: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

/// Errors from reading operator input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("interrupted by user")]
    Interrupted,

    #[error("terminal error: {0}")]
    Io(String),
}

/// Result type for core operations; uses [`CloneError`].
pub type Result<T> = std::result::Result<T, CloneError>;
