// Unit tests for error module

use crate::error::LightSwitcherError;

use switcher_core::SwitcherConfig;
use switcher_core::error::config::ConfigError;

/// **VALUE**: Verifies that config failures keep their text when surfaced by the app.
///
/// **WHY THIS MATTERS**: A bad config file is the most likely startup failure. The user
/// needs the reason, not just "core error".
#[test]
fn given_config_validation_error_when_converted_then_core_variant_keeps_reason() {
    // GIVEN
    let mut config = SwitcherConfig::default();
    config.network.connect_timeout_ms = 0;
    let config_error: ConfigError = config.validate().unwrap_err();

    // WHEN
    let err = LightSwitcherError::from(config_error);

    // THEN
    assert!(matches!(err, LightSwitcherError::Core { .. }));
    assert!(err.message().contains("connect_timeout_ms"));
    assert!(err.to_string().starts_with("Core Error: "));
}

#[test]
fn given_command_error_when_displayed_then_includes_location() {
    let err = "fly away".parse::<crate::console::ConsoleCommand>().unwrap_err();

    let text = err.to_string();

    assert!(text.starts_with("Command Error: "), "{text}");
    assert!(text.contains(".rs:"), "{text}");
}
