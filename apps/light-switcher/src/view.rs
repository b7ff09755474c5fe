//! Text rendering of engine events.
//!
//! The engine reports through [`UiEvent`]s; this module is the only place
//! that turns them into terminal output.

use models::{ConnectionStatus, LightState, UiEvent};

use std::io::Write;

use log::warn;
use tokio::sync::mpsc::UnboundedReceiver;

const LIGHT_INDICATOR_LABEL: &str = "[light] ";
const CONNECTION_INDICATOR_LABEL: &str = "[connection] ";

/// What the user currently sees: indicator values and which controls are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub lights: LightState,
    pub connection: ConnectionStatus,
    /// True while `disconnect` is the live control and `connect` is disabled.
    pub connected: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            lights: LightState::Off,
            connection: ConnectionStatus::Down,
            connected: false,
        }
    }
}

impl ViewState {
    /// Fold one event into the view and return the line to print, if any.
    pub fn apply(&mut self, event: &UiEvent) -> Option<String> {
        match event {
            UiEvent::Log(line) => Some(line.clone()),
            UiEvent::Lights(state) => {
                self.lights = *state;
                Some(format!("{LIGHT_INDICATOR_LABEL}{}", state.as_display()))
            }
            UiEvent::Connection(status) => {
                self.connection = *status;
                Some(format!("{CONNECTION_INDICATOR_LABEL}{status}"))
            }
            UiEvent::Controls { connected } => {
                self.connected = *connected;
                None
            }
        }
    }
}

/// Print events until every sender is gone.
pub async fn render_events<W>(mut events: UnboundedReceiver<UiEvent>, mut out: W) -> ViewState
where
    W: Write,
{
    let mut view = ViewState::default();

    while let Some(event) = events.recv().await {
        if let Some(line) = view.apply(&event) {
            if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
                warn!("Failed to write to console: {e}");
            }
        }
    }

    view
}
