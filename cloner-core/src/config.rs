//! Run configuration: raw values from environment/CLI, then a resolved, immutable [`CloneConfig`].
//!
//! Only [`RawConfig::from_env`] touches the process environment; everything downstream gets the
//! resolved config passed in.

use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;

use crate::error::{CloneError, Result};
use crate::prompt::{ask_integer, ask_required, Prompter};

pub const API_ID: &str = "API_ID";
pub const API_HASH: &str = "API_HASH";
pub const SESSION_FILE: &str = "SESSION_FILE";
pub const LOG_FILE: &str = "LOG_FILE";
pub const SOURCE_CHAT: &str = "SOURCE_CHAT";
pub const DESTINATION_CHAT: &str = "DESTINATION_CHAT";
pub const START_DATE: &str = "START_DATE";
pub const COPY_COUNT: &str = "COPY_COUNT";
pub const FLOOD_WAIT_POLICY: &str = "FLOOD_WAIT_POLICY";
pub const FLOOD_WAIT_MAX_RETRIES: &str = "FLOOD_WAIT_MAX_RETRIES";
pub const DIALOG_LIMIT: &str = "DIALOG_LIMIT";

pub const DEFAULT_SESSION_FILE: &str = "tg-clone.session";
pub const DEFAULT_LOG_FILE: &str = "logs/tg-clone.log";
pub const DEFAULT_DIALOG_LIMIT: usize = 200;
pub const DEFAULT_FLOOD_WAIT_RETRIES: u32 = 3;

/// Unparsed settings, one per variable. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    pub api_id: Option<String>,
    pub api_hash: Option<String>,
    pub session_file: Option<String>,
    pub log_file: Option<String>,
    pub source: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub copy_count: Option<String>,
    pub flood_wait_policy: Option<String>,
    pub flood_wait_max_retries: Option<String>,
    pub dialog_limit: Option<String>,
}

impl RawConfig {
    /// Reads every setting through `lookup` (variable name -> value).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            api_id: get(API_ID),
            api_hash: get(API_HASH),
            session_file: get(SESSION_FILE),
            log_file: get(LOG_FILE),
            source: get(SOURCE_CHAT),
            destination: get(DESTINATION_CHAT),
            start_date: get(START_DATE),
            copy_count: get(COPY_COUNT),
            flood_wait_policy: get(FLOOD_WAIT_POLICY),
            flood_wait_max_retries: get(FLOOD_WAIT_MAX_RETRIES),
            dialog_limit: get(DIALOG_LIMIT),
        }
    }

    /// Reads from the process environment. Load `.env` before calling.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn log_file(&self) -> &str {
        self.log_file.as_deref().unwrap_or(DEFAULT_LOG_FILE)
    }
}

/// Whether missing values may be asked for on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Interactive,
    NonInteractive,
}

/// What to do with the message that hit a rate-limit wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloodWaitPolicy {
    /// Sleep, then move on; the triggering message is dropped.
    Skip,
    /// Sleep, then send the same message again, at most `max_retries` times.
    Resend { max_retries: u32 },
}

impl FloodWaitPolicy {
    fn parse(policy: Option<&str>, max_retries: Option<&str>) -> Result<Self> {
        let max_retries = match max_retries {
            Some(v) => v.parse::<u32>().map_err(|_| {
                CloneError::Config(format!(
                    "{} must be a non-negative integer, got {:?}",
                    FLOOD_WAIT_MAX_RETRIES, v
                ))
            })?,
            None => DEFAULT_FLOOD_WAIT_RETRIES,
        };
        match policy.map(|p| p.to_ascii_lowercase()).as_deref() {
            None | Some("skip") => Ok(Self::Skip),
            Some("resend") | Some("retry") => Ok(Self::Resend { max_retries }),
            Some(other) => Err(CloneError::Config(format!(
                "{} must be `skip` or `resend`, got {:?}",
                FLOOD_WAIT_POLICY, other
            ))),
        }
    }
}

/// Lower date bound for the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDate {
    Unbounded,
    From(NaiveDate),
    /// Ask the operator after endpoints are resolved.
    Ask,
}

/// How many of the fetched messages to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyCount {
    All,
    Exactly(usize),
    /// Ask the operator once the fetched total is known.
    Ask,
}

/// Resolved run configuration. Built once at startup, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneConfig {
    pub api_id: i32,
    pub api_hash: String,
    pub session_file: PathBuf,
    pub log_file: String,
    /// `None`: pick from the dialog listing.
    pub source: Option<String>,
    pub destination: Option<String>,
    pub start_date: StartDate,
    pub copy_count: CopyCount,
    pub flood_wait: FloodWaitPolicy,
    pub dialog_limit: usize,
    pub mode: RunMode,
}

/// Parses `YYYY-MM-DD`.
pub fn parse_start_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

impl CloneConfig {
    /// Builds the config without any terminal interaction.
    ///
    /// In non-interactive mode every missing required value is reported together, each with an
    /// example. In interactive mode missing values are left for [`CloneConfig::resolve`] to ask.
    pub fn from_raw(raw: &RawConfig, mode: RunMode) -> Result<Self> {
        if mode == RunMode::NonInteractive {
            let missing = missing_settings(raw);
            if !missing.is_empty() {
                return Err(CloneError::Config(format!(
                    "missing required settings:\n{}\nSet them in .env or the environment.",
                    missing.join("\n")
                )));
            }
        }

        let api_id = match raw.api_id.as_deref() {
            Some(v) => parse_api_id(v)?,
            None => 0,
        };
        let start_date = match raw.start_date.as_deref() {
            Some(v) => StartDate::From(parse_start_date(v).ok_or_else(|| {
                CloneError::Config(format!(
                    "{} must be YYYY-MM-DD (e.g. 2024-01-31), got {:?}",
                    START_DATE, v
                ))
            })?),
            None if mode == RunMode::Interactive => StartDate::Ask,
            None => StartDate::Unbounded,
        };
        let copy_count = match raw.copy_count.as_deref() {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => CopyCount::Exactly(n),
                _ => {
                    return Err(CloneError::Config(format!(
                        "{} must be a positive integer, got {:?}",
                        COPY_COUNT, v
                    )))
                }
            },
            None if mode == RunMode::Interactive => CopyCount::Ask,
            None => CopyCount::All,
        };
        let dialog_limit = match raw.dialog_limit.as_deref() {
            Some(v) => v.parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                CloneError::Config(format!(
                    "{} must be a positive integer, got {:?}",
                    DIALOG_LIMIT, v
                ))
            })?,
            None => DEFAULT_DIALOG_LIMIT,
        };

        Ok(Self {
            api_id,
            api_hash: raw.api_hash.clone().unwrap_or_default(),
            session_file: PathBuf::from(
                raw.session_file.as_deref().unwrap_or(DEFAULT_SESSION_FILE),
            ),
            log_file: raw.log_file().to_string(),
            source: raw.source.clone(),
            destination: raw.destination.clone(),
            start_date,
            copy_count,
            flood_wait: FloodWaitPolicy::parse(
                raw.flood_wait_policy.as_deref(),
                raw.flood_wait_max_retries.as_deref(),
            )?,
            dialog_limit,
            mode,
        })
    }

    /// [`CloneConfig::from_raw`], then asks for any credential still missing (interactive only).
    pub async fn resolve(raw: &RawConfig, mode: RunMode, prompter: &dyn Prompter) -> Result<Self> {
        let mut config = Self::from_raw(raw, mode)?;
        if raw.api_id.is_none() {
            config.api_id = ask_integer::<i32>(prompter, "Enter API_ID").await?;
        }
        if raw.api_hash.is_none() {
            config.api_hash = ask_required(prompter, "Enter API_HASH").await?;
        }
        Ok(config)
    }
}

fn parse_api_id(value: &str) -> Result<i32> {
    value.parse::<i32>().map_err(|_| {
        CloneError::Config(format!(
            "{} must be an integer (e.g. {}=1234567), got {:?}",
            API_ID, API_ID, value
        ))
    })
}

/// One explanation line per missing required setting.
fn missing_settings(raw: &RawConfig) -> Vec<String> {
    let required = [
        (&raw.api_id, API_ID, "numeric app id from my.telegram.org", "1234567"),
        (
            &raw.api_hash,
            API_HASH,
            "app hash from my.telegram.org",
            "0123456789abcdef0123456789abcdef",
        ),
        (
            &raw.source,
            SOURCE_CHAT,
            "conversation to copy from (username or numeric id)",
            "@source_channel",
        ),
        (
            &raw.destination,
            DESTINATION_CHAT,
            "conversation to copy into (username or numeric id)",
            "-1001234567890",
        ),
    ];
    required
        .iter()
        .filter(|(value, ..)| value.is_none())
        .map(|(_, key, what, example)| format!("  {}: {} (e.g. {}={})", key, what, key, example))
        .collect()
}
