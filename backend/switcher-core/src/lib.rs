pub mod config;
pub mod connection;
pub mod constants;
pub mod device;
pub mod error;
pub mod protocol;
pub mod ui;

#[cfg(test)]
mod tests;

pub use config::SwitcherConfig;
pub use connection::{ConnectionManager, ConnectionPhase, Endpoint};
pub use device::DeviceState;
pub use error::CoreError;
pub use protocol::{CommandDispatcher, Framer, MessageCodec, WireEncoding};
pub use ui::{UiHandle, VerboseLogging};
