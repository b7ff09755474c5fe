use crate::{ConnectionStatus, LightState};

/// Notification pushed from the protocol engine to the presentation layer.
///
/// The engine never touches widgets; it only emits these and lets the
/// receiving side render them on whatever thread owns the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Free-text line for the log view.
    Log(String),

    /// Light indicator changed.
    Lights(LightState),

    /// Connection indicator changed.
    Connection(ConnectionStatus),

    /// Connect/disconnect controls must be re-armed.
    ///
    /// `connected` is true for the whole connecting/connected window: connect and
    /// port input disabled, disconnect enabled.
    Controls { connected: bool },
}
