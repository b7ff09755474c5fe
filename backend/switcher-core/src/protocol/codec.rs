//! Record encoding and decoding.
//!
//! A segment has the shape `<Label><Value>;`. Decoding looks for the earliest
//! recognized label before the first delimiter; anything in front of it (e.g.
//! zero padding from a peer that flushes its whole buffer) is ignored.

use crate::error::protocol::ProtocolError;
use crate::protocol::encoding::WireEncoding;

use common::ErrorLocation;
use models::{RECORD_DELIMITER, Record, RecordBuilder, RecordKey};

use std::panic::Location;

use bytes::Bytes;

#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCodec {
    encoding: WireEncoding,
}

impl MessageCodec {
    pub fn new(encoding: WireEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> WireEncoding {
        self.encoding
    }

    pub fn encode(&self, record: &Record) -> Bytes {
        Bytes::from(self.encoding.encode(&record.to_string()))
    }

    /// Decode one framed segment.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Encoding`] if the bytes are not valid text
    /// - [`ProtocolError::UnknownLabel`] if no recognized label is present
    #[track_caller]
    pub fn decode(&self, segment: &[u8]) -> Result<Record, ProtocolError> {
        let text = self.encoding.decode(segment)?;
        self.decode_text(&text)
    }

    #[track_caller]
    pub fn decode_text(&self, text: &str) -> Result<Record, ProtocolError> {
        let body = match text.find(RECORD_DELIMITER) {
            Some(end) => &text[..end],
            None => text,
        };

        let found = RecordKey::ALL
            .iter()
            .filter_map(|key| body.find(key.label()).map(|start| (start, *key)))
            .min_by_key(|(start, _)| *start);

        let Some((start, key)) = found else {
            return Err(ProtocolError::UnknownLabel {
                segment: text.trim_matches('\0').to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let value = &body[start + key.label().len()..];

        RecordBuilder::default()
            .with_key(key)
            .with_value(value)
            .build()
            .map_err(|e| ProtocolError::UnknownLabel {
                segment: format!("{}: {e}", text.trim_matches('\0')),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
