use crate::constants::{
    CONNECTION_ALREADY_ACTIVE_MESSAGE, CONNECTION_ATTEMPT_CANCELLED_MESSAGE,
    CONNECTION_LOG_LABEL, CONNECTION_UNAVAILABLE_MESSAGE, IPADDRESS_LOG_LABEL,
    NETWORK_LOG_LABEL, NOT_CONNECTED_MESSAGE, PORT_LOG_LABEL,
};

use common::ErrorLocation;

use std::io::Error as IoError;
use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ConnectionError {
    #[error("Invalid Address Error: {message} {location}")]
    InvalidAddress {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Port Error: {message} {location}")]
    InvalidPort {
        message: String,
        location: ErrorLocation,
    },

    #[error("Already Active Error: {message} {location}")]
    AlreadyActive {
        message: String,
        location: ErrorLocation,
    },

    #[error("Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
    },

    #[error("Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cancelled Error: {message} {location}")]
    Cancelled {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not Connected Error: {message} {location}")]
    NotConnected {
        message: String,
        location: ErrorLocation,
    },

    #[error("IO Error: {message} {location}")]
    Io {
        message: String,
        location: ErrorLocation,
    },
}

impl ConnectionError {
    /// True for errors raised before any transport was created.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConnectionError::InvalidAddress { .. } | ConnectionError::InvalidPort { .. }
        )
    }

    pub fn message(&self) -> &str {
        match self {
            ConnectionError::InvalidAddress { message, .. }
            | ConnectionError::InvalidPort { message, .. }
            | ConnectionError::AlreadyActive { message, .. }
            | ConnectionError::Connect { message, .. }
            | ConnectionError::Timeout { message, .. }
            | ConnectionError::Cancelled { message, .. }
            | ConnectionError::NotConnected { message, .. }
            | ConnectionError::Io { message, .. } => message,
        }
    }

    /// Line shown in the UI log.
    ///
    /// Validation problems are always shown in full. Transport problems only
    /// carry their low-level message when `verbose` is set.
    pub fn ui_line(&self, verbose: bool) -> String {
        match self {
            ConnectionError::InvalidAddress { message, .. } => {
                format!("{IPADDRESS_LOG_LABEL}{message}")
            }
            ConnectionError::InvalidPort { message, .. } => format!("{PORT_LOG_LABEL}{message}"),
            ConnectionError::AlreadyActive { .. } => CONNECTION_ALREADY_ACTIVE_MESSAGE.to_string(),
            ConnectionError::NotConnected { .. } => NOT_CONNECTED_MESSAGE.to_string(),
            ConnectionError::Cancelled { .. } => CONNECTION_ATTEMPT_CANCELLED_MESSAGE.to_string(),
            ConnectionError::Connect { message, .. } | ConnectionError::Timeout { message, .. }
                if verbose =>
            {
                format!("{CONNECTION_LOG_LABEL}{message}")
            }
            ConnectionError::Io { message, .. } if verbose => {
                format!("{NETWORK_LOG_LABEL}{message}")
            }
            ConnectionError::Connect { .. }
            | ConnectionError::Timeout { .. }
            | ConnectionError::Io { .. } => CONNECTION_UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

impl From<IoError> for ConnectionError {
    #[track_caller]
    fn from(error: IoError) -> Self {
        ConnectionError::Io {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
