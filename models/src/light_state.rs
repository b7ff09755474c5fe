use crate::ErrorLocation;
use crate::error::model_error::ModelError;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const WIRE_TRUE: &str = "True";
const WIRE_FALSE: &str = "False";
const DISPLAY_ON: &str = "on";
const DISPLAY_OFF: &str = "off";

/// Whether the simulated light is lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LightState {
    On,
    #[default]
    Off,
}

impl LightState {
    pub fn is_on(self) -> bool {
        matches!(self, LightState::On)
    }

    pub fn toggled(self) -> Self {
        match self {
            LightState::On => LightState::Off,
            LightState::Off => LightState::On,
        }
    }

    /// Literal carried in a `Lights: ` record.
    pub fn as_wire(self) -> &'static str {
        match self {
            LightState::On => WIRE_TRUE,
            LightState::Off => WIRE_FALSE,
        }
    }

    /// Short label shown next to the light indicator.
    pub fn as_display(self) -> &'static str {
        match self {
            LightState::On => DISPLAY_ON,
            LightState::Off => DISPLAY_OFF,
        }
    }
}

impl From<bool> for LightState {
    fn from(on: bool) -> Self {
        if on { LightState::On } else { LightState::Off }
    }
}

impl From<LightState> for bool {
    fn from(state: LightState) -> Self {
        state.is_on()
    }
}

impl Display for LightState {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_display())
    }
}

impl FromStr for LightState {
    type Err = ModelError;

    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            WIRE_TRUE => Ok(LightState::On),
            WIRE_FALSE => Ok(LightState::Off),
            other => Err(ModelError::Validation {
                message: format!("Unknown lights value: {other:?}"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
