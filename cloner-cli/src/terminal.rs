//! Terminal prompter backed by dialoguer.
//!
//! Prompts run on the blocking pool. Ctrl-C inside a prompt and end of input both surface as
//! [`PromptError::Interrupted`].

use async_trait::async_trait;
use cloner_core::{PromptError, Prompter};
use dialoguer::{Input, Password};
use std::io;

#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn map_error(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(e)
            if matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
            ) =>
        {
            PromptError::Interrupted
        }
        other => PromptError::Io(other.to_string()),
    }
}

async fn blocking<F>(read: F) -> Result<String, PromptError>
where
    F: FnOnce() -> Result<String, dialoguer::Error> + Send + 'static,
{
    match tokio::task::spawn_blocking(read).await {
        Ok(Ok(line)) => Ok(line.trim().to_string()),
        Ok(Err(e)) => Err(map_error(e)),
        Err(e) => Err(PromptError::Io(e.to_string())),
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn ask(&self, prompt: &str) -> Result<String, PromptError> {
        let prompt = prompt.to_string();
        blocking(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
        })
        .await
    }

    async fn ask_secret(&self, prompt: &str) -> Result<String, PromptError> {
        let prompt = prompt.to_string();
        blocking(move || Password::new().with_prompt(prompt).interact()).await
    }

    fn say(&self, line: &str) {
        println!("{}", line);
    }
}
