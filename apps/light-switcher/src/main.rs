use light_switcher::console::{Console, HELP_TEXT};
use light_switcher::error::LightSwitcherError;
use light_switcher::logger::{
    DEFAULT_LOG_LEVEL, ENV_LOG_LEVEL, initialize as LoggerInitialize, resolve_level,
};
use light_switcher::view::render_events;

use switcher_core::{ConnectionManager, SwitcherConfig, UiHandle, VerboseLogging};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::io::stdout;
use std::panic::Location;
use std::path::PathBuf;
use std::time::Duration;

use log::{info, warn};
use tokio::io::{BufReader, stdin};

const APP_DIR_NAME: &str = "light-switcher";
const RENDER_DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<(), LightSwitcherError> {
    // Optional .env with LIGHT_SWITCHER_* overrides
    dotenvy::dotenv().ok();

    let log_dir = app_dir(dirs::data_local_dir())?.join("logs");
    create_dir_all(&log_dir).map_err(|e| LightSwitcherError::App {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    let requested_level = resolve_level(|name| std::env::var(name).ok());
    LoggerInitialize(&log_dir, requested_level.clone().unwrap_or(DEFAULT_LOG_LEVEL))?;
    if let Err(raw) = requested_level {
        warn!("Ignoring {ENV_LOG_LEVEL}={raw:?}, using {DEFAULT_LOG_LEVEL}");
    }

    info!("Light switcher starting");
    info!("Log directory: {}", log_dir.display());

    let config_dir = app_dir(dirs::config_dir())?;
    let config = SwitcherConfig::load(&config_dir)?;
    info!(
        "Wire encoding: {}, device type: {}",
        config.network.encoding, config.device.device_type
    );

    let verbose = VerboseLogging::new(false);
    let (ui, events) = UiHandle::channel(verbose.clone());
    let render = tokio::spawn(render_events(events, stdout()));

    let manager = ConnectionManager::new(config, ui.clone());
    let console = Console::new(manager.clone(), verbose, ui.clone());

    ui.log(HELP_TEXT);
    let result = console.run(BufReader::new(stdin())).await;

    // Closing the app always releases the connection.
    manager.disconnect().await;
    drop(console);
    drop(manager);
    drop(ui);

    if tokio::time::timeout(RENDER_DRAIN_TIMEOUT, render).await.is_err() {
        warn!("Console view did not drain in time");
    }

    info!("Light switcher stopped");
    result
}

fn app_dir(base: Option<PathBuf>) -> Result<PathBuf, LightSwitcherError> {
    base.map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| LightSwitcherError::App {
            message: "Failed to resolve a per-user directory".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
}
