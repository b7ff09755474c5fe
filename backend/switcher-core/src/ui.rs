//! Boundary to the presentation layer.
//!
//! The engine never touches widgets. It pushes [`UiEvent`]s down a channel and
//! the receiving side renders them on its own thread. The verbose flag is
//! owned by the UI; the engine only reads it.

use models::{ConnectionStatus, LightState, UiEvent};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, trace};
use tokio::sync::mpsc;

/// `log` target of every mirrored UI line, so a front end can route them apart.
pub const UI_LOG_TARGET: &str = "switcher_core::ui";

/// Verbose-logging toggle shared with the UI.
///
/// Cloning shares the flag. The engine reads it at the moment it logs.
#[derive(Debug, Clone, Default)]
pub struct VerboseLogging(Arc<AtomicBool>);

impl VerboseLogging {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Flip the flag. Called by the UI only.
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

/// Sending half of the UI event channel.
///
/// Cheap to clone; every component that reports to the user holds one.
#[derive(Debug, Clone)]
pub struct UiHandle {
    events: mpsc::UnboundedSender<UiEvent>,
    verbose: VerboseLogging,
}

impl UiHandle {
    /// Create a handle and the receiver the UI drains.
    pub fn channel(verbose: VerboseLogging) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self { events, verbose }, receiver)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.is_enabled()
    }

    /// Log line shown regardless of verbosity.
    pub fn log(&self, line: impl Into<String>) {
        let line = line.into();
        info!(target: UI_LOG_TARGET, "{line}");
        self.emit(UiEvent::Log(line));
    }

    /// Log line shown only while verbose logging is on.
    pub fn verbose(&self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: UI_LOG_TARGET, "{line}");
        if self.is_verbose() {
            self.emit(UiEvent::Log(line));
        }
    }

    pub fn lights(&self, state: LightState) {
        self.emit(UiEvent::Lights(state));
    }

    pub fn connection(&self, status: ConnectionStatus) {
        debug!("Connection indicator: {status}");
        self.emit(UiEvent::Connection(status));
    }

    pub fn controls(&self, connected: bool) {
        self.emit(UiEvent::Controls { connected });
    }

    fn emit(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            trace!("UI receiver dropped, event discarded");
        }
    }
}
