//! Logging for the light switcher console.
//!
//! Three outputs:
//! - stderr, colored, warnings and errors only (stdout belongs to the console view)
//! - `light-switcher.log`, every record at the chosen level, tagged with its target
//! - `light-switcher-session.log`, the user-facing lines the engine showed or would
//!   have shown with verbose logging on, one per line with a timestamp

use crate::error::LightSwitcherError;

use common::ErrorLocation;
use switcher_core::ui::UI_LOG_TARGET;

use std::fs::File;
use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::{format_rfc3339, format_rfc3339_seconds};
use log::{LevelFilter, info, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Diagnostic log file name.
pub const LOG_FILE_NAME: &str = "light-switcher.log";

/// Transcript of UI log lines.
pub const SESSION_LOG_FILE_NAME: &str = "light-switcher-session.log";

/// Overrides the build's default level, e.g. `trace` or `warn`.
pub const ENV_LOG_LEVEL: &str = "LIGHT_SWITCHER_LOG_LEVEL";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

#[cfg(debug_assertions)]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Only problems reach the terminal; it is shared with the console view.
const CONSOLE_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Level named by [`ENV_LOG_LEVEL`], or the build default when unset.
///
/// # Errors
///
/// Returns the raw value when it names no level, so the caller can report it
/// once logging is up.
pub fn resolve_level<F>(lookup: F) -> Result<LevelFilter, String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(ENV_LOG_LEVEL) {
        None => Ok(DEFAULT_LOG_LEVEL),
        Some(raw) => raw.trim().parse().map_err(|_| raw),
    }
}

/// True for records mirrored from the engine's UI log lines.
pub fn is_ui_line(target: &str) -> bool {
    target == UI_LOG_TARGET
}

/// One line of the session transcript.
pub fn transcript_line(at: SystemTime, message: &str) -> String {
    format!("[{}] {message}", format_rfc3339_seconds(at))
}

/// Initialize the logger with stderr, diagnostic file and session transcript.
///
/// Safe to call more than once: later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns an error if:
/// - Either log file cannot be created
/// - Logger dispatch configuration fails
pub fn initialize(log_dir: &Path, level: LevelFilter) -> Result<(), LightSwitcherError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(log_dir, level);
        if result.is_ok() {
            info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

#[track_caller]
fn open_log_file(log_dir: &Path, file_name: &str) -> Result<File, LightSwitcherError> {
    fern::log_file(log_dir.join(file_name)).map_err(|e| LightSwitcherError::App {
        message: format!("Failed to create log file {file_name}: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn initialize_internal(log_dir: &Path, level: LevelFilter) -> Result<(), LightSwitcherError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    // Verbose-only UI lines are emitted at debug; the transcript keeps them.
    let base_dispatch = Dispatch::new()
        .level(level)
        .level_for(UI_LOG_TARGET, level.max(LevelFilter::Debug));

    // Stderr dispatch (colored, problems only)
    let console_dispatch = Dispatch::new()
        .level(CONSOLE_LOG_LEVEL)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
            ))
        })
        .chain(stderr());

    // Diagnostic file (plain text, target instead of file:line)
    let file_dispatch = Dispatch::new()
        .level(level)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level:<5} {target}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                target = record.target(),
                message = message,
            ))
        })
        .chain(open_log_file(log_dir, LOG_FILE_NAME)?);

    // Session transcript (UI lines only)
    let session_dispatch = Dispatch::new()
        .filter(|metadata| is_ui_line(metadata.target()))
        .format(|out, message, _| {
            out.finish(format_args!(
                "{}",
                transcript_line(SystemTime::now(), &message.to_string())
            ))
        })
        .chain(open_log_file(log_dir, SESSION_LOG_FILE_NAME)?);

    base_dispatch
        .chain(console_dispatch)
        .chain(file_dispatch)
        .chain(session_dispatch)
        .apply()
        .map_err(|e| LightSwitcherError::App {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    Ok(())
}
