//! Connection state machine.
//!
//! ```text
//! Idle ──connect──► Connecting ──ok──► Connected ──disconnect / I/O error──► Disconnecting ──► Idle
//!                        │
//!                        └──fail──► Failed ──► Idle
//! ```
//!
//! Only one attempt or session may exist at a time; [`Lifecycle::begin_connect`]
//! is the single gate.

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::sync::{Mutex, PoisonError};

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Idle,
    Connecting,
    Connected,
    Disconnecting,
    Failed,
}

impl ConnectionPhase {
    /// True while the connect control must stay disabled.
    pub fn is_active(self) -> bool {
        matches!(self, ConnectionPhase::Connecting | ConnectionPhase::Connected)
    }
}

impl Display for ConnectionPhase {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let name = match self {
            ConnectionPhase::Idle => "idle",
            ConnectionPhase::Connecting => "connecting",
            ConnectionPhase::Connected => "connected",
            ConnectionPhase::Disconnecting => "disconnecting",
            ConnectionPhase::Failed => "failed",
        };
        formatter.write_str(name)
    }
}

/// Current phase behind a short-lived lock. Never held across an await.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    phase: Mutex<ConnectionPhase>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            phase: Mutex::new(ConnectionPhase::Idle),
        }
    }

    pub(crate) fn current(&self) -> ConnectionPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move `Idle -> Connecting`.
    ///
    /// Returns the blocking phase if anything other than `Idle` is current.
    pub(crate) fn begin_connect(&self) -> Result<(), ConnectionPhase> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase != ConnectionPhase::Idle {
            return Err(*phase);
        }
        *phase = ConnectionPhase::Connecting;
        debug!("Connection phase: idle -> connecting");
        Ok(())
    }

    pub(crate) fn set(&self, next: ConnectionPhase) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *phase != next {
            debug!("Connection phase: {} -> {}", *phase, next);
            *phase = next;
        }
    }
}
