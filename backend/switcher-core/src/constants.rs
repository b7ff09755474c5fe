//! Fixed protocol and UI constants.
//!
//! Nothing here is mutable at runtime; tunables live in
//! [`SwitcherConfig`](crate::config::SwitcherConfig).

use const_format::concatcp;

/// Lowest port a user may connect to (first registered port).
pub const MINIMAL_PORT_VALUE: u16 = 1024;

/// Highest port a user may connect to (last registered port).
pub const MAXIMAL_PORT_VALUE: u16 = 49151;

/// Default size of the receive buffer handed to each read.
pub const DEFAULT_RECEIVE_BUFFER_SIZE: usize = 8192;

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

/// Device type announced in the `Device: ` record.
pub const DEFAULT_DEVICE_TYPE: &str = "LightSwitcher";

// UI log labels.
pub const IPADDRESS_LOG_LABEL: &str = "IP Address: ";
pub const PORT_LOG_LABEL: &str = "Port: ";
pub const CONNECTION_LOG_LABEL: &str = "Connection: ";
pub const NETWORK_LOG_LABEL: &str = "Network: ";

pub const PORT_RANGE_MESSAGE: &str = concatcp!(
    "Incorrect port value. [",
    MINIMAL_PORT_VALUE,
    "; ",
    MAXIMAL_PORT_VALUE,
    "] ports are allowed."
);

pub const CONNECTION_UNAVAILABLE_MESSAGE: &str =
    concatcp!(CONNECTION_LOG_LABEL, "Connection's unavailable.");
pub const CONNECTION_ALREADY_ACTIVE_MESSAGE: &str =
    concatcp!(CONNECTION_LOG_LABEL, "A connection is already active.");
pub const CONNECTION_MANUALLY_CLOSED_MESSAGE: &str =
    concatcp!(CONNECTION_LOG_LABEL, "Connection was manually closed");
pub const CONNECTION_ATTEMPT_CANCELLED_MESSAGE: &str =
    concatcp!(CONNECTION_LOG_LABEL, "Connection attempt was cancelled");
pub const NOT_CONNECTED_MESSAGE: &str = concatcp!(CONNECTION_LOG_LABEL, "Not connected");
pub const DISCONNECTED_MESSAGE: &str = concatcp!(NETWORK_LOG_LABEL, "Disconnected.");
pub const RECEIVE_LOOP_STOPPED_MESSAGE: &str =
    concatcp!(NETWORK_LOG_LABEL, "Receive loop was stopped");
pub const PEER_CLOSED_MESSAGE: &str = concatcp!(NETWORK_LOG_LABEL, "Peer closed the connection");
pub const SENT_INFO_MESSAGE: &str = concatcp!(NETWORK_LOG_LABEL, "Sent info");
pub const SWITCH_REQUESTED_MESSAGE: &str =
    concatcp!(NETWORK_LOG_LABEL, "Lights switch was requested.");
pub const STATUS_REQUESTED_MESSAGE: &str = concatcp!(NETWORK_LOG_LABEL, "Status was requested.");
pub const PEER_DISCONNECT_MESSAGE: &str =
    concatcp!(NETWORK_LOG_LABEL, "Peer announced it is disconnecting.");
