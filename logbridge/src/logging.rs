//! Logging infrastructure for logbridge.
//!
//! Every event becomes one line, `[YYYY-MM-DD HH:MM:SS] <message>`:
//! - Always printed to stdout
//! - Appended to the configured log file when file logging is enabled
//! - Level filter configurable via RUST_LOG environment variable
//!
//! The log file is written through a single non-blocking worker, so lines
//! from concurrent listeners and dispatch tasks never interleave. Failing to
//! open or write the file never affects the caller.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use chrono::Local;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Timestamp layout at the start of every line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors from logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Event formatter producing `[timestamp] message key=value ...` lines.
///
/// Info events carry no level marker; other levels are prefixed with the
/// level name so warnings stand out in the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeFormat;

impl<S, N> FormatEvent<S, N> for BridgeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}] ", Local::now().format(TIMESTAMP_FORMAT))?;

        let level = *event.metadata().level();
        if level != Level::INFO {
            write!(writer, "{} ", level)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initialize the logging system.
///
/// Sets up stdout output and, when enabled in `settings`, append-mode file
/// output. If the log file cannot be opened, logging continues on stdout
/// only and a warning is emitted.
///
/// # Arguments
///
/// * `settings` - The `[log]` section of the configuration
/// * `debug_mode` - When true, enables debug-level logging regardless of RUST_LOG
///
/// # Returns
///
/// LoggingGuard that must be kept alive for file logging to work
pub fn init_logging(
    settings: &LoggingSettings,
    debug_mode: bool,
) -> Result<LoggingGuard, LoggingError> {
    let mut open_error = None;
    let file = if settings.enabled {
        match open_log_file(&settings.file) {
            Ok(file) => Some(file),
            Err(e) => {
                open_error = Some(e);
                None
            }
        }
    } else {
        None
    };

    let (file_layer, file_guard) = match file {
        Some(file) => {
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .event_format(BridgeFormat);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(false)
        .event_format(BridgeFormat);

    let env_filter = if debug_mode {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    if let Some(e) = open_error {
        tracing::warn!(
            "Log file {} unavailable, logging to stdout only: {}",
            settings.file.display(),
            e
        );
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Open the log file for appending, creating it if needed.
fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}


#[cfg(test)]
mod tests {
    use super::capture::LogCapture;
    use super::*;
    use std::io::Write;

    fn capture_lines(f: impl FnOnce()) -> String {
        let (capture, _guard) = LogCapture::install();
        f();
        capture.contents()
    }

    #[test]
    fn test_info_line_format() {
        let output = capture_lines(|| tracing::info!("bridge starting"));

        assert!(output.starts_with('['), "got {:?}", output);
        assert_eq!(&output[20..22], "] ");
        assert_eq!(&output[22..], "bridge starting\n");
    }

    #[test]
    fn test_timestamp_layout() {
        let output = capture_lines(|| tracing::info!("x"));
        let stamp = &output[1..20];

        assert!(chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_warn_line_carries_level() {
        let output = capture_lines(|| tracing::warn!("POST error: timed out"));

        assert!(output.ends_with("] WARN POST error: timed out\n"), "got {:?}", output);
    }

    #[test]
    fn test_one_line_per_event() {
        let output = capture_lines(|| {
            tracing::info!("first");
            tracing::info!("second");
        });

        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bridge.log");
        std::fs::write(&path, "existing\n").unwrap();

        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "appended").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "existing\nappended\n"
        );
    }

    #[test]
    fn test_open_log_file_missing_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("bridge.log");

        assert!(open_log_file(&path).is_err());
    }
}
