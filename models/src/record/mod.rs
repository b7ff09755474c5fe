//! Typed protocol records.
//!
//! A record is one `<Label><Value>;` unit on the wire. Everything past the
//! codec works with [`Record`] values and never looks at raw text.

pub mod builder;

use crate::ErrorLocation;
use crate::LightState;
use crate::error::model_error::ModelError;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::str::FromStr;

/// Terminator of every record.
pub const RECORD_DELIMITER: char = ';';

/// Status value meaning "device healthy".
pub const DEVICE_STATUS_UP: i32 = 42;

const DEVICE_LABEL: &str = "Device: ";
const LIGHTS_LABEL: &str = "Lights: ";
const METHOD_LABEL: &str = "Method: ";
const STATUS_LABEL: &str = "Status: ";

const METHOD_SWITCH: &str = "SWITCH";
const METHOD_DISCONNECT: &str = "DISCONNECT";
const METHOD_REQUEST_STATUS: &str = "REQUEST_STATUS";

/// Recognized record labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// Device type identifier, sent once after connecting.
    Device,
    /// `True`/`False` light state.
    Lights,
    /// Command to invoke, see [`Method`].
    Method,
    /// Health report, always [`DEVICE_STATUS_UP`].
    Status,
}

impl RecordKey {
    pub const ALL: [RecordKey; 4] = [
        RecordKey::Device,
        RecordKey::Lights,
        RecordKey::Method,
        RecordKey::Status,
    ];

    /// Label as written on the wire, trailing space included.
    pub fn label(self) -> &'static str {
        match self {
            RecordKey::Device => DEVICE_LABEL,
            RecordKey::Lights => LIGHTS_LABEL,
            RecordKey::Method => METHOD_LABEL,
            RecordKey::Status => STATUS_LABEL,
        }
    }
}

/// Commands carried by a `Method: ` record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Switch,
    Disconnect,
    RequestStatus,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Switch => METHOD_SWITCH,
            Method::Disconnect => METHOD_DISCONNECT,
            Method::RequestStatus => METHOD_REQUEST_STATUS,
        }
    }
}

impl FromStr for Method {
    type Err = ModelError;

    #[track_caller]
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            METHOD_SWITCH => Ok(Method::Switch),
            METHOD_DISCONNECT => Ok(Method::Disconnect),
            METHOD_REQUEST_STATUS => Ok(Method::RequestStatus),
            other => Err(ModelError::Validation {
                message: format!("Unknown method: {other:?}"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl Display for Method {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

/// One decoded `key: value` unit.
///
/// The value never contains [`RECORD_DELIMITER`]; [`builder::RecordBuilder`]
/// enforces this for untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    key: RecordKey,
    value: String,
}

impl Record {
    pub fn device(device_type: &str) -> Self {
        Self {
            key: RecordKey::Device,
            value: device_type.replace(RECORD_DELIMITER, ""),
        }
    }

    pub fn lights(state: LightState) -> Self {
        Self {
            key: RecordKey::Lights,
            value: state.as_wire().to_string(),
        }
    }

    pub fn method(method: Method) -> Self {
        Self {
            key: RecordKey::Method,
            value: method.as_str().to_string(),
        }
    }

    pub fn status(status: i32) -> Self {
        Self {
            key: RecordKey::Status,
            value: status.to_string(),
        }
    }

    pub fn key(&self) -> RecordKey {
        self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Interpret the value of a `Method: ` record.
    ///
    /// Returns `None` for any other key.
    pub fn as_method(&self) -> Option<Result<Method, ModelError>> {
        (self.key == RecordKey::Method).then(|| self.value.parse())
    }
}

/// Renders the exact wire text, delimiter included.
impl Display for Record {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(
            formatter,
            "{}{}{}",
            self.key.label(),
            self.value,
            RECORD_DELIMITER
        )
    }
}
