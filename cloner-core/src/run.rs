//! Whole-run orchestration and its state machine.
//!
//! `Configuring -> Authenticating -> ResolvingEndpoints -> Fetching -> Selecting -> Replicating
//! -> Done`, with `Aborted` reachable from any non-terminal state.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::client::ChatClient;
use crate::config::{parse_start_date, CloneConfig, CopyCount, StartDate};
use crate::error::{CloneError, PromptError, Result};
use crate::fetcher::fetch_history;
use crate::progress::ProgressFactory;
use crate::prompt::Prompter;
use crate::replicator::{replicate, ReplicationReport};
use crate::resolver::{choose_conversation, resolve_direct};
use crate::selection::{prompt_copy_count, select_oldest, CountChoice};
use crate::types::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Configuring,
    Authenticating,
    ResolvingEndpoints,
    Fetching,
    Selecting,
    Replicating,
    Done,
    Aborted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Aborted)
    }

    fn successor(self) -> Option<RunState> {
        use RunState::*;
        match self {
            Configuring => Some(Authenticating),
            Authenticating => Some(ResolvingEndpoints),
            ResolvingEndpoints => Some(Fetching),
            Fetching => Some(Selecting),
            Selecting => Some(Replicating),
            Replicating => Some(Done),
            Done | Aborted => None,
        }
    }
}

/// Tracks the run state and rejects out-of-order transitions.
#[derive(Debug, Clone)]
pub struct RunTracker {
    visited: Vec<RunState>,
}

impl Default for RunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTracker {
    pub fn new() -> Self {
        Self {
            visited: vec![RunState::Configuring],
        }
    }

    pub fn state(&self) -> RunState {
        *self.visited.last().unwrap_or(&RunState::Configuring)
    }

    /// Every state entered so far, in order.
    pub fn visited(&self) -> &[RunState] {
        &self.visited
    }

    pub fn advance(&mut self, next: RunState) -> Result<()> {
        let from = self.state();
        if from.successor() != Some(next) {
            return Err(CloneError::InvalidTransition { from, to: next });
        }
        info!(from = ?from, to = ?next, "Run state changed");
        self.visited.push(next);
        Ok(())
    }

    /// Moves to `Aborted` unless already terminal.
    pub fn abort(&mut self) {
        let from = self.state();
        if !from.is_terminal() {
            warn!(from = ?from, "Run aborted");
            self.visited.push(RunState::Aborted);
        }
    }
}

/// Why the operator ended the run early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    NoSource,
    NoDestination,
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed(ReplicationReport),
    Cancelled(CancelReason),
}

/// Runs resolve -> fetch -> select -> replicate against an authenticated `client`.
///
/// `tracker` must be in `Authenticating`. On return it is `Done` or `Aborted`. Operator
/// cancellations (blank selector, interrupt at a prompt) are `Ok(RunOutcome::Cancelled)`.
#[instrument(skip_all)]
pub async fn run_clone<C: ChatClient>(
    client: &C,
    prompter: &dyn Prompter,
    progress: &dyn ProgressFactory,
    config: &CloneConfig,
    tracker: &mut RunTracker,
) -> Result<RunOutcome> {
    let result = execute(client, prompter, progress, config, tracker).await;
    let result = match result {
        Err(CloneError::Prompt(PromptError::Interrupted)) => {
            Ok(RunOutcome::Cancelled(CancelReason::Interrupted))
        }
        other => other,
    };

    match &result {
        Ok(RunOutcome::Completed(_)) => {}
        Ok(RunOutcome::Cancelled(reason)) => {
            prompter.say(cancel_message(*reason));
            tracker.abort();
        }
        Err(_) => tracker.abort(),
    }
    result
}

fn cancel_message(reason: CancelReason) -> &'static str {
    match reason {
        CancelReason::NoSource => "No source selected. Exiting.",
        CancelReason::NoDestination => "No destination selected. Exiting.",
        CancelReason::Interrupted => "Operation cancelled by user.",
    }
}

async fn execute<C: ChatClient>(
    client: &C,
    prompter: &dyn Prompter,
    progress: &dyn ProgressFactory,
    config: &CloneConfig,
    tracker: &mut RunTracker,
) -> Result<RunOutcome> {
    tracker.advance(RunState::ResolvingEndpoints)?;
    let source = match endpoint(
        client,
        prompter,
        config,
        config.source.as_deref(),
        "Select source conversation",
    )
    .await?
    {
        Some(conv) => conv,
        None => return Ok(RunOutcome::Cancelled(CancelReason::NoSource)),
    };
    let destination = match endpoint(
        client,
        prompter,
        config,
        config.destination.as_deref(),
        "Select destination conversation",
    )
    .await?
    {
        Some(conv) => conv,
        None => return Ok(RunOutcome::Cancelled(CancelReason::NoDestination)),
    };
    prompter.say(&format!("Source: {}", source.display_name()));
    prompter.say(&format!("Destination: {}", destination.display_name()));

    let start_date = match config.start_date {
        StartDate::Unbounded => None,
        StartDate::From(date) => Some(date),
        StartDate::Ask => ask_start_date(prompter).await?,
    };

    tracker.advance(RunState::Fetching)?;
    let messages = fetch_history(client, &source, start_date, progress).await?;
    let total = messages.len();
    match start_date {
        Some(date) => prompter.say(&format!("Messages since {}: {}", date, total)),
        None => prompter.say(&format!("Messages fetched: {}", total)),
    }

    tracker.advance(RunState::Selecting)?;
    let choice = if total == 0 {
        CountChoice::All
    } else {
        match config.copy_count {
            CopyCount::All => CountChoice::All,
            CopyCount::Exactly(n) if n >= total => {
                if n > total {
                    warn!(requested = n, total, "Copy count exceeds fetched messages, copying all");
                }
                CountChoice::All
            }
            CopyCount::Exactly(n) => CountChoice::Exactly(n),
            CopyCount::Ask => prompt_copy_count(prompter, total).await?,
        }
    };
    let selected = select_oldest(messages, choice);

    tracker.advance(RunState::Replicating)?;
    prompter.say(&format!("Starting clone of {} messages...", selected.len()));
    let report = replicate(client, &destination, &selected, config.flood_wait, progress).await;

    tracker.advance(RunState::Done)?;
    prompter.say("Clone finished.");
    Ok(RunOutcome::Completed(report))
}

/// Preset selector if configured, else the interactive listing.
async fn endpoint<C: ChatClient>(
    client: &C,
    prompter: &dyn Prompter,
    config: &CloneConfig,
    preset: Option<&str>,
    label: &str,
) -> Result<Option<Conversation>> {
    match preset {
        Some(selector) => resolve_direct(client, selector).await,
        None => choose_conversation(client, prompter, label, config.dialog_limit).await,
    }
}

async fn ask_start_date(prompter: &dyn Prompter) -> Result<Option<NaiveDate>> {
    loop {
        let input = prompter
            .ask("Start date (YYYY-MM-DD) or Enter for all")
            .await?;
        if input.is_empty() {
            return Ok(None);
        }
        match parse_start_date(&input) {
            Some(date) => return Ok(Some(date)),
            None => prompter.say("Invalid format. Use YYYY-MM-DD."),
        }
    }
}
