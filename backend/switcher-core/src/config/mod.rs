//! Runtime tunables.
//!
//! Nothing is required on disk: defaults match the controlling peer. An optional
//! `light-switcher.toml` and `LIGHT_SWITCHER_*` environment variables can
//! override them. Config is never written back.

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_DEVICE_TYPE, DEFAULT_RECEIVE_BUFFER_SIZE,
};
use crate::error::config::ConfigError;
use crate::protocol::WireEncoding;

use common::ErrorLocation;
use models::{LightState, RECORD_DELIMITER};

use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "light-switcher.toml";
const CONFIG_VERSION: u32 = 1;
const MIN_RECEIVE_BUFFER_SIZE: usize = 16;

pub const ENV_CONNECT_TIMEOUT_MS: &str = "LIGHT_SWITCHER_CONNECT_TIMEOUT_MS";
pub const ENV_RECEIVE_BUFFER_SIZE: &str = "LIGHT_SWITCHER_RECEIVE_BUFFER_SIZE";
pub const ENV_ENCODING: &str = "LIGHT_SWITCHER_ENCODING";
pub const ENV_DEVICE_TYPE: &str = "LIGHT_SWITCHER_DEVICE_TYPE";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_receive_buffer_size")]
    pub receive_buffer_size: usize,
    #[serde(default)]
    pub encoding: WireEncoding,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: default_connect_timeout_ms(),
            receive_buffer_size: default_receive_buffer_size(),
            encoding: WireEncoding::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default = "default_device_type")]
    pub device_type: String,
    #[serde(default)]
    pub lights_on_at_start: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            device_type: default_device_type(),
            lights_on_at_start: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitcherConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub device: DeviceConfig,
}

impl Default for SwitcherConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            network: NetworkConfig::default(),
            device: DeviceConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}
fn default_receive_buffer_size() -> usize {
    DEFAULT_RECEIVE_BUFFER_SIZE
}
fn default_device_type() -> String {
    DEFAULT_DEVICE_TYPE.to_string()
}

// ============================================
// IMPLEMENTATION
// ============================================

impl SwitcherConfig {
    /// Load `{config_dir}/light-switcher.toml`, then apply environment overrides.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed,
    /// or if the resulting values fail validation.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError {
                    location: ErrorLocation::from(Location::caller()),
                    path: config_path.clone(),
                    source: e,
                })?;

            let config: SwitcherConfig =
                toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                    location: ErrorLocation::from(Location::caller()),
                    path: config_path.clone(),
                    reason: e.to_string(),
                })?;

            info!("Config loaded from {}", config_path.display());
            config
        } else {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay values from a variable lookup (normally the process environment).
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT_MS) {
            match raw.trim().parse() {
                Ok(value) => self.network.connect_timeout_ms = value,
                Err(e) => warn!("Ignoring {ENV_CONNECT_TIMEOUT_MS}={raw:?}: {e}"),
            }
        }

        if let Some(raw) = lookup(ENV_RECEIVE_BUFFER_SIZE) {
            match raw.trim().parse() {
                Ok(value) => self.network.receive_buffer_size = value,
                Err(e) => warn!("Ignoring {ENV_RECEIVE_BUFFER_SIZE}={raw:?}: {e}"),
            }
        }

        if let Some(raw) = lookup(ENV_ENCODING) {
            match raw.parse() {
                Ok(value) => self.network.encoding = value,
                Err(e) => warn!("Ignoring {ENV_ENCODING}: {e}"),
            }
        }

        if let Some(raw) = lookup(ENV_DEVICE_TYPE) {
            self.device.device_type = raw;
        }
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        if self.network.connect_timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "connect_timeout_ms must be greater than zero".to_string(),
            });
        }

        if self.network.receive_buffer_size < MIN_RECEIVE_BUFFER_SIZE {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "receive_buffer_size must be at least {MIN_RECEIVE_BUFFER_SIZE} (got {})",
                    self.network.receive_buffer_size
                ),
            });
        }

        let device_type = &self.device.device_type;
        if device_type.trim().is_empty() || device_type.contains(RECORD_DELIMITER) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid device_type: {device_type:?}"),
            });
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.network.connect_timeout_ms)
    }

    pub fn initial_lights(&self) -> LightState {
        LightState::from(self.device.lights_on_at_start)
    }
}
