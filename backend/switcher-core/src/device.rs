//! The simulated light.

use crate::ui::UiHandle;

use models::LightState;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Light on/off flag shared by the UI context and the receive loop.
///
/// Every mutation is followed by a UI notification. Pushing the new state to
/// the peer is the caller's job since only the caller knows whether a session
/// exists.
#[derive(Debug, Clone)]
pub struct DeviceState {
    lights: Arc<AtomicBool>,
    ui: UiHandle,
}

impl DeviceState {
    pub fn new(initial: LightState, ui: UiHandle) -> Self {
        Self {
            lights: Arc::new(AtomicBool::new(initial.is_on())),
            ui,
        }
    }

    pub fn get(&self) -> LightState {
        LightState::from(self.lights.load(Ordering::SeqCst))
    }

    /// Invert the light and notify the UI. Returns the new state.
    pub fn toggle(&self) -> LightState {
        let previous = self.lights.fetch_xor(true, Ordering::SeqCst);
        let current = LightState::from(!previous);
        self.ui.lights(current);
        current
    }

    /// Re-send the current state to the UI without changing it.
    pub fn publish(&self) {
        self.ui.lights(self.get());
    }
}
