use crate::error::protocol::ProtocolError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const UTF16LE_DELIMITER: &[u8] = &[b';', 0x00];
const UTF8_DELIMITER: &[u8] = b";";

/// Text encoding shared by both peers.
///
/// The controlling peer speaks UTF-16LE, so that is the default. Both encodings
/// are scanned one code unit at a time, which is why the delimiter is also the
/// unit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireEncoding {
    #[default]
    Utf16Le,
    Utf8,
}

impl WireEncoding {
    /// Encoded form of the record delimiter.
    pub fn delimiter(self) -> &'static [u8] {
        match self {
            WireEncoding::Utf16Le => UTF16LE_DELIMITER,
            WireEncoding::Utf8 => UTF8_DELIMITER,
        }
    }

    /// Bytes per code unit.
    pub fn unit_width(self) -> usize {
        self.delimiter().len()
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            WireEncoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            WireEncoding::Utf8 => text.as_bytes().to_vec(),
        }
    }

    #[track_caller]
    pub fn decode(self, bytes: &[u8]) -> Result<String, ProtocolError> {
        match self {
            WireEncoding::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(ProtocolError::Encoding {
                        message: format!("odd UTF-16 byte count: {}", bytes.len()),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|e| ProtocolError::Encoding {
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            WireEncoding::Utf8 => {
                String::from_utf8(bytes.to_vec()).map_err(|e| ProtocolError::Encoding {
                    message: e.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WireEncoding::Utf16Le => "utf16le",
            WireEncoding::Utf8 => "utf8",
        }
    }
}

impl Display for WireEncoding {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for WireEncoding {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "utf16le" | "utf-16le" | "utf16" | "unicode" => Ok(WireEncoding::Utf16Le),
            "utf8" | "utf-8" => Ok(WireEncoding::Utf8),
            other => Err(format!("unknown wire encoding: {other:?}")),
        }
    }
}
