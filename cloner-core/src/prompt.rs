//! Operator seam: line-based questions and notices.

use async_trait::async_trait;

use crate::error::PromptError;

/// Asks the operator for input and shows them plain lines.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Shows `prompt` and returns the entered line, trimmed. Blank input is returned as `""`.
    async fn ask(&self, prompt: &str) -> Result<String, PromptError>;

    /// Like `ask` but without echo (passwords).
    async fn ask_secret(&self, prompt: &str) -> Result<String, PromptError> {
        self.ask(prompt).await
    }

    /// Writes one line for the operator.
    fn say(&self, line: &str);
}

/// Asks until a non-empty answer is given.
pub async fn ask_required(prompter: &dyn Prompter, prompt: &str) -> Result<String, PromptError> {
    loop {
        let answer = prompter.ask(prompt).await?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        prompter.say("A value is required. Try again.");
    }
}

/// Asks until an integer is given.
pub async fn ask_integer<T: std::str::FromStr>(
    prompter: &dyn Prompter,
    prompt: &str,
) -> Result<T, PromptError> {
    loop {
        let answer = ask_required(prompter, prompt).await?;
        match answer.parse::<T>() {
            Ok(value) => return Ok(value),
            Err(_) => prompter.say("Enter a valid integer."),
        }
    }
}
