use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Non-fatal decode failures. These are logged as unknown data, never raised
/// past the receive loop.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
    #[error("Unknown Label Error: {segment:?} {location}")]
    UnknownLabel {
        segment: String,
        location: ErrorLocation,
    },

    #[error("Encoding Error: {message} {location}")]
    Encoding {
        message: String,
        location: ErrorLocation,
    },
}

impl ProtocolError {
    /// Best-effort text of the offending segment for the UI log.
    pub fn segment_text(&self) -> &str {
        match self {
            ProtocolError::UnknownLabel { segment, .. } => segment,
            ProtocolError::Encoding { message, .. } => message,
        }
    }
}
