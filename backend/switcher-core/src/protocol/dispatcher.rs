//! Interprets inbound records.

use crate::constants::{
    NETWORK_LOG_LABEL, PEER_DISCONNECT_MESSAGE, STATUS_REQUESTED_MESSAGE,
    SWITCH_REQUESTED_MESSAGE,
};
use crate::device::DeviceState;
use crate::ui::UiHandle;

use models::{DEVICE_STATUS_UP, Method, Record};

use log::debug;

/// Maps inbound records to state changes and replies.
///
/// Each call performs at most one device mutation, returns at most one reply
/// and reports once. Records must be dispatched in arrival order: a `SWITCH`
/// followed by `REQUEST_STATUS` sees the switched state.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    device: DeviceState,
    ui: UiHandle,
}

impl CommandDispatcher {
    pub fn new(device: DeviceState, ui: UiHandle) -> Self {
        Self { device, ui }
    }

    /// Handle one record, returning the reply to send, if any.
    pub fn dispatch(&self, record: &Record) -> Option<Record> {
        match record.as_method() {
            Some(Ok(Method::Switch)) => {
                self.ui.log(SWITCH_REQUESTED_MESSAGE);
                let state = self.device.toggle();
                Some(Record::lights(state))
            }
            Some(Ok(Method::RequestStatus)) => {
                self.ui.verbose(STATUS_REQUESTED_MESSAGE);
                Some(Record::status(DEVICE_STATUS_UP))
            }
            Some(Ok(Method::Disconnect)) => {
                self.ui.log(PEER_DISCONNECT_MESSAGE);
                None
            }
            Some(Err(e)) => {
                debug!("Ignoring method record: {e}");
                self.ui.log(unknown_data_line(&record.to_string()));
                None
            }
            None => {
                self.ui.log(unknown_data_line(&record.to_string()));
                None
            }
        }
    }
}

/// UI line for input the engine does not act on.
pub(crate) fn unknown_data_line(data: &str) -> String {
    format!("{NETWORK_LOG_LABEL}Received unknown data: \"{data}\"")
}
