//! Domain models for the light switcher.
//!
//! This crate contains pure data structures shared between the protocol
//! engine and whatever presents it. Models have no I/O - they're just data
//! that can be passed between layers.
//!
//! ## Architecture
//!
//! - **models** (this crate): Records, light and connection states, UI events
//! - **switcher-core**: Framing, codec, dispatch and the connection lifecycle
//! - **light-switcher**: Console front end wiring everything together

pub mod connection_status;
pub mod error;
pub mod light_state;
pub mod record;
pub mod ui_event;

pub use common::ErrorLocation;
pub use connection_status::ConnectionStatus;
pub use error::model_error::ModelError;
pub use light_state::LightState;
pub use record::builder::RecordBuilder;
pub use record::{DEVICE_STATUS_UP, Method, RECORD_DELIMITER, Record, RecordKey};
pub use ui_event::UiEvent;

#[cfg(test)]
mod tests;
