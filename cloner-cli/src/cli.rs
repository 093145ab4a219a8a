//! CLI parser. Flags override the matching environment variables.

use clap::{Args, Parser, Subcommand};
use cloner_core::{RawConfig, RunMode};

#[derive(Parser)]
#[command(name = "tg-clone")]
#[command(
    about = "Copy message history from one Telegram conversation to another",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clone messages (credentials from env / .env, or asked for).
    Run(RunArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Never prompt; every required value must come from env or flags.
    #[arg(long)]
    pub non_interactive: bool,

    /// Source conversation: @username or numeric id (SOURCE_CHAT).
    #[arg(short, long, allow_hyphen_values = true)]
    pub source: Option<String>,

    /// Destination conversation: @username or numeric id (DESTINATION_CHAT).
    #[arg(short, long, allow_hyphen_values = true)]
    pub destination: Option<String>,

    /// Only copy messages from this day on, YYYY-MM-DD (START_DATE).
    #[arg(long)]
    pub start_date: Option<String>,

    /// Copy only the N oldest messages (COPY_COUNT).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Send the message that hit a rate-limit wait again after waiting.
    #[arg(long)]
    pub resend_after_wait: bool,

    /// Session file path (SESSION_FILE).
    #[arg(long)]
    pub session_file: Option<String>,
}

impl RunArgs {
    pub fn mode(&self) -> RunMode {
        if self.non_interactive {
            RunMode::NonInteractive
        } else {
            RunMode::Interactive
        }
    }

    /// Overlays flags on values read from the environment.
    pub fn apply(&self, mut raw: RawConfig) -> RawConfig {
        if let Some(source) = &self.source {
            raw.source = Some(source.clone());
        }
        if let Some(destination) = &self.destination {
            raw.destination = Some(destination.clone());
        }
        if let Some(date) = &self.start_date {
            raw.start_date = Some(date.clone());
        }
        if let Some(count) = self.count {
            raw.copy_count = Some(count.to_string());
        }
        if self.resend_after_wait {
            raw.flood_wait_policy = Some("resend".to_string());
        }
        if let Some(path) = &self.session_file {
            raw.session_file = Some(path.clone());
        }
        raw
    }
}
