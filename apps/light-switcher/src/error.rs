use common::ErrorLocation;

use switcher_core::error::CoreError;
use switcher_core::error::config::ConfigError;

use std::panic::Location;

use thiserror::Error;

/// Errors surfaced by the console application.
///
/// Engine errors are reported to the user through the UI log; only startup
/// failures and bad console input end up here.
#[derive(Debug, Error)]
pub enum LightSwitcherError {
    /// Error from this App
    #[error("Light Switcher Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Error from switcher-core (config, connection)
    #[error("Core Error: {message} {location}")]
    Core {
        message: String,
        location: ErrorLocation,
    },

    /// Console input that is not a known command
    #[error("Command Error: {message} {location}")]
    Command {
        message: String,
        location: ErrorLocation,
    },
}

impl LightSwitcherError {
    pub fn message(&self) -> &str {
        match self {
            LightSwitcherError::App { message, .. }
            | LightSwitcherError::Core { message, .. }
            | LightSwitcherError::Command { message, .. } => message,
        }
    }
}

impl From<CoreError> for LightSwitcherError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        LightSwitcherError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for LightSwitcherError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        LightSwitcherError::Core {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
