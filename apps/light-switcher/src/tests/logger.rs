// Unit tests for logger module initialization logic
// Tests focus on thread-safety and error handling

use crate::logger::{
    DEFAULT_LOG_LEVEL, ENV_LOG_LEVEL, initialize, is_ui_line, resolve_level, transcript_line,
};

use switcher_core::ui::UI_LOG_TARGET;

use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};

use log::LevelFilter;
use tempfile::TempDir;

fn lookup_from(value: Option<&str>) -> impl Fn(&str) -> Option<String> {
    let value = value.map(str::to_string);
    move |name| (name == ENV_LOG_LEVEL).then(|| value.clone()).flatten()
}

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: A global logger can only be installed once. A second call from
/// another start-up path must not crash the console.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to panic when trying to set a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A valid temporary directory
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path(), LevelFilter::Info);
    let result2 = initialize(temp_dir.path(), LevelFilter::Info);

    // THEN: Both should return Ok (second one logs warning but doesn't error)
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: Verifies that an unusable log directory is reported, not panicked on.
///
/// **WHY THIS MATTERS**: A read-only or missing data directory must give a clear startup
/// error instead of a crash.
///
/// **NOTE**: The logger is process-global. If another test in this binary initialized
/// it first, the call is a no-op and returns Ok, so only the error shape is checked.
#[test]
fn given_invalid_log_dir_when_initialize_called_then_never_panics() {
    // GIVEN: A path that cannot hold a file
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN
    let result = initialize(&invalid_dir, LevelFilter::Info);

    // THEN
    if let Err(err) = result {
        let err_string = format!("{err:?}");
        assert!(
            err_string.contains("App"),
            "Error should be LightSwitcherError::App variant"
        );
        assert!(err.message().contains("log file"));
    }
}

#[test]
fn given_no_override_when_level_resolved_then_build_default_is_used() {
    assert_eq!(resolve_level(lookup_from(None)), Ok(DEFAULT_LOG_LEVEL));
}

#[test]
fn given_level_override_when_resolved_then_case_and_whitespace_are_ignored() {
    assert_eq!(resolve_level(lookup_from(Some(" TRACE "))), Ok(LevelFilter::Trace));
    assert_eq!(resolve_level(lookup_from(Some("warn"))), Ok(LevelFilter::Warn));
}

/// **VALUE**: Verifies a typo in the level override is handed back instead of dropped.
///
/// **BUG THIS CATCHES**: A misspelt level silently turning logging off, or the bad value
/// never being reported to the user.
#[test]
fn given_unknown_level_when_resolved_then_raw_value_is_returned() {
    assert_eq!(
        resolve_level(lookup_from(Some("chatty"))),
        Err("chatty".to_string())
    );
}

/// **VALUE**: Verifies only the engine's UI lines are routed into the session transcript.
///
/// **WHY THIS MATTERS**: The transcript is what the user saw. Internal diagnostics from
/// the manager or the receive loop would drown it.
#[test]
fn given_log_targets_when_checked_then_only_ui_target_is_a_transcript_line() {
    assert!(is_ui_line(UI_LOG_TARGET));
    assert!(!is_ui_line("switcher_core::connection::manager"));
    assert!(!is_ui_line("light_switcher::console"));
}

#[test]
fn given_timestamp_and_line_when_formatted_then_transcript_line_is_stamped_to_the_second() {
    // GIVEN
    let at = UNIX_EPOCH + Duration::from_millis(90_250);

    // WHEN
    let line = transcript_line(at, "Connection: Connected to 127.0.0.1:8080");

    // THEN
    assert_eq!(
        line,
        "[1970-01-01T00:01:30Z] Connection: Connected to 127.0.0.1:8080"
    );
}
