//! Selection filter: how many of the fetched messages get copied.

use thiserror::Error;

use crate::error::PromptError;
use crate::prompt::Prompter;

/// Operator's copy-count answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChoice {
    All,
    Exactly(usize),
}

/// Why a typed copy count was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountInputError {
    #[error("Invalid input. Type a number or press Enter.")]
    NotANumber,

    #[error("Enter a number greater than zero, or press Enter to copy all.")]
    NotPositive,

    #[error("There are only {total} messages. Enter at most that.")]
    ExceedsTotal { total: usize },
}

/// Parses a copy count against `total` fetched messages. Blank means all.
pub fn parse_copy_count(input: &str, total: usize) -> Result<CountChoice, CountInputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(CountChoice::All);
    }
    let n: i64 = input.parse().map_err(|_| CountInputError::NotANumber)?;
    if n <= 0 {
        return Err(CountInputError::NotPositive);
    }
    let n = n as usize;
    if n > total {
        return Err(CountInputError::ExceedsTotal { total });
    }
    Ok(CountChoice::Exactly(n))
}

/// Asks until a valid count is entered. An interrupt is passed through for the caller to cancel.
pub async fn prompt_copy_count(
    prompter: &dyn Prompter,
    total: usize,
) -> Result<CountChoice, PromptError> {
    let question = format!("How many messages to copy? (1-{}) or Enter for all", total);
    loop {
        let input = prompter.ask(&question).await?;
        match parse_copy_count(&input, total) {
            Ok(choice) => return Ok(choice),
            Err(e) => prompter.say(&e.to_string()),
        }
    }
}

/// Keeps the first `n` entries of an oldest-first buffer, i.e. the `n` oldest.
pub fn select_oldest<T>(mut messages: Vec<T>, choice: CountChoice) -> Vec<T> {
    if let CountChoice::Exactly(n) = choice {
        messages.truncate(n);
    }
    messages
}
