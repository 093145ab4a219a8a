//! Logging setup: one plain-text line per event, written to the console and appended to a file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::format::{FmtSpan, Writer},
    fmt::time::FormatTime,
    fmt::writer::MakeWriterExt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

const DEFAULT_FILTER: &str = "info";

/// `YYYY-MM-DD HH:MM:SS` in local time.
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{} ", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

/// Opens `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber: `RUST_LOG` filter (default `info`), lines of the form
/// `2024-01-31 10:00:00 INFO [target] message key=value`, no ANSI colors, stdout + `log_file`.
///
/// `#[instrument]` spans only contribute their fields; entering and leaving them is not logged.
/// Call once, after `.env` is loaded.
pub fn init_tracing(log_file: &str) -> anyhow::Result<()> {
    let file = Arc::new(open_log_file(Path::new(log_file))?);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let format = tracing_subscriber::fmt::format()
        .with_timer(LocalClock)
        .with_level(true)
        .with_target(true)
        .with_thread_ids(false);

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout.and(file))
        .event_format(format)
        .with_span_events(FmtSpan::NONE)
        .with_ansi(false);

    Registry::default()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
}
