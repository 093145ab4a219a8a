//! Run wiring: config -> logging -> session -> pipeline -> session close.

use anyhow::{Context, Result};
use cloner_core::{
    init_tracing, run_clone, CloneConfig, CloneError, LogProgressFactory, PromptError, Prompter,
    RawConfig, ReplicationReport, RunOutcome, RunState, RunTracker,
};
use cloner_telegram::TelegramSession;
use tracing::{error, info, instrument};

use crate::cli::RunArgs;
use crate::terminal::TerminalPrompter;

/// Progress lines are logged every this many messages.
const PROGRESS_STRIDE: u64 = 50;

/// Runs one clone. Configuration errors and run failures are returned (non-zero exit);
/// operator cancellation is not an error.
#[instrument(skip(args))]
pub async fn run(args: RunArgs) -> Result<()> {
    let raw = args.apply(RawConfig::from_env());
    init_tracing(raw.log_file()).context("Initialize logging (check LOG_FILE)")?;

    let prompter = TerminalPrompter::new();
    let mut tracker = RunTracker::new();

    let config = match CloneConfig::resolve(&raw, args.mode(), &prompter).await {
        Ok(config) => config,
        Err(CloneError::Prompt(PromptError::Interrupted)) => {
            prompter.say("Operation cancelled by user.");
            tracker.abort();
            return Ok(());
        }
        Err(e) => {
            tracker.abort();
            return Err(e).context("Load configuration from .env, environment or flags");
        }
    };
    info!(
        session_file = %config.session_file.display(),
        flood_wait = ?config.flood_wait,
        mode = ?config.mode,
        "Configuration loaded"
    );

    tracker.advance(RunState::Authenticating)?;
    let session = match TelegramSession::open(&config, &prompter).await {
        Ok(session) => session,
        Err(CloneError::Prompt(PromptError::Interrupted)) => {
            prompter.say("Operation cancelled by user.");
            tracker.abort();
            return Ok(());
        }
        Err(e) => {
            tracker.abort();
            return Err(e).context("Connect to Telegram (check API_ID / API_HASH)");
        }
    };

    let client = session.client();
    let progress = LogProgressFactory::new(PROGRESS_STRIDE);
    let result = run_clone(&client, &prompter, &progress, &config, &mut tracker).await;
    session.close();

    match result {
        Ok(RunOutcome::Completed(report)) => {
            prompter.say(&summary(&report));
            Ok(())
        }
        Ok(RunOutcome::Cancelled(reason)) => {
            info!(reason = ?reason, "Run cancelled");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, state = ?tracker.state(), "Run aborted");
            Err(e.into())
        }
    }
}

fn summary(report: &ReplicationReport) -> String {
    let mut line = format!("Copied {} of {} messages", report.sent, report.processed);
    if report.skipped_empty > 0 {
        line.push_str(&format!(", {} without content skipped", report.skipped_empty));
    }
    if report.failed > 0 {
        line.push_str(&format!(", {} failed", report.failed));
    }
    if report.flood_waits > 0 {
        line.push_str(&format!(
            ", waited {}s over {} rate limit(s), {} not resent",
            report.waited_secs, report.flood_waits, report.dropped_after_wait
        ));
    }
    line.push('.');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_plain() {
        let report = ReplicationReport {
            processed: 5,
            sent: 5,
            ..ReplicationReport::default()
        };
        assert_eq!(summary(&report), "Copied 5 of 5 messages.");
    }

    #[test]
    fn test_summary_with_failures_and_waits() {
        let report = ReplicationReport {
            processed: 20,
            sent: 17,
            skipped_empty: 1,
            failed: 1,
            dropped_after_wait: 1,
            flood_waits: 1,
            waited_secs: 30,
        };
        assert_eq!(
            summary(&report),
            "Copied 17 of 20 messages, 1 without content skipped, 1 failed, \
             waited 30s over 1 rate limit(s), 1 not resent."
        );
    }
}
