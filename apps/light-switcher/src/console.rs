//! Line-oriented control surface.
//!
//! Stands in for the window: each input line maps to one of the controls the
//! user would click. Feedback goes through the same UI log as engine events.

use crate::error::LightSwitcherError;

use common::ErrorLocation;
use switcher_core::{ConnectionManager, UiHandle, VerboseLogging};

use std::ops::ControlFlow;
use std::panic::Location;
use std::str::FromStr;

use log::{debug, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const CONSOLE_LOG_LABEL: &str = "Console: ";

pub const HELP_TEXT: &str = "commands: connect <address> <port> | disconnect | switch | \
verbose on|off | status | help | quit";

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Connect { address: String, port: String },
    Disconnect,
    Switch,
    Verbose(bool),
    Status,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = LightSwitcherError;

    #[track_caller]
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let arguments: Vec<&str> = words.collect();

        let command = match (name.as_str(), arguments.as_slice()) {
            ("connect", [address, port]) => ConsoleCommand::Connect {
                address: address.to_string(),
                port: port.to_string(),
            },
            ("disconnect", []) => ConsoleCommand::Disconnect,
            ("switch" | "toggle", []) => ConsoleCommand::Switch,
            ("verbose", ["on"]) => ConsoleCommand::Verbose(true),
            ("verbose", ["off"]) => ConsoleCommand::Verbose(false),
            ("status", []) => ConsoleCommand::Status,
            ("help" | "?", []) => ConsoleCommand::Help,
            ("quit" | "exit", []) => ConsoleCommand::Quit,
            _ => {
                return Err(LightSwitcherError::Command {
                    message: format!("Unknown command {:?}. {HELP_TEXT}", line.trim()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}

/// Console bound to one manager.
pub struct Console {
    manager: ConnectionManager,
    verbose: VerboseLogging,
    ui: UiHandle,
}

impl Console {
    pub fn new(manager: ConnectionManager, verbose: VerboseLogging, ui: UiHandle) -> Self {
        Self {
            manager,
            verbose,
            ui,
        }
    }

    /// Perform one command. `Break` means the user asked to quit.
    ///
    /// Engine failures are already reported to the UI by the manager, so
    /// they are only traced here.
    pub async fn execute(&self, command: ConsoleCommand) -> ControlFlow<()> {
        match command {
            ConsoleCommand::Connect { address, port } => {
                if let Err(e) = self.manager.connect(&address, &port).await {
                    debug!("Connect command failed: {e}");
                }
            }
            ConsoleCommand::Disconnect => self.manager.disconnect().await,
            ConsoleCommand::Switch => {
                self.manager.toggle_light().await;
            }
            ConsoleCommand::Verbose(enabled) => {
                self.verbose.set(enabled);
                let state = if enabled { "on" } else { "off" };
                self.ui
                    .log(format!("{CONSOLE_LOG_LABEL}Verbose logging is {state}"));
            }
            ConsoleCommand::Status => {
                let endpoint = match self.manager.endpoint().await {
                    Some(endpoint) => endpoint.to_string(),
                    None => String::from("none"),
                };
                self.ui.log(format!(
                    "{CONSOLE_LOG_LABEL}{} (peer {endpoint}), light {}",
                    self.manager.phase(),
                    self.manager.light_state().as_display()
                ));
            }
            ConsoleCommand::Help => self.ui.log(format!("{CONSOLE_LOG_LABEL}{HELP_TEXT}")),
            ConsoleCommand::Quit => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    /// Read commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns [`LightSwitcherError::App`] if reading the input fails.
    pub async fn run<R>(&self, input: R) -> Result<(), LightSwitcherError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| LightSwitcherError::App {
                message: format!("Failed to read console input: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?
        {
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<ConsoleCommand>() {
                Ok(command) => {
                    if self.execute(command).await.is_break() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("{e}");
                    self.ui.log(format!("{CONSOLE_LOG_LABEL}{}", e.message()));
                }
            }
        }

        Ok(())
    }
}
