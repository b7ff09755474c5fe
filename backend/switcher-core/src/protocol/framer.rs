//! Reassembles `;`-terminated records from a byte stream.
//!
//! TCP hands us arbitrary slices: a read may end in the middle of a record, or
//! (for UTF-16) in the middle of a code unit. Everything after the last
//! delimiter stays in the pending buffer until the next read completes it.

use crate::protocol::encoding::WireEncoding;

use bytes::{Bytes, BytesMut};

/// Splits a raw byte stream into complete record segments.
///
/// Each emitted segment includes its trailing delimiter. Bytes are never
/// reordered, dropped or emitted twice.
#[derive(Debug)]
pub struct Framer {
    encoding: WireEncoding,
    /// Unterminated tail of the stream.
    pending: BytesMut,
    /// Bytes of `pending` already searched without finding a delimiter.
    /// Always a multiple of the code-unit width.
    scanned: usize,
}

impl Framer {
    pub fn new(encoding: WireEncoding) -> Self {
        Self {
            encoding,
            pending: BytesMut::with_capacity(256),
            scanned: 0,
        }
    }

    /// Append a chunk and return every segment it completes, in arrival order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Bytes> {
        if chunk.is_empty() {
            return Vec::new();
        }

        self.pending.extend_from_slice(chunk);

        let mut segments = Vec::new();
        while let Some(end) = self.next_boundary() {
            segments.push(self.pending.split_to(end).freeze());
            self.scanned = 0;
        }
        segments
    }

    /// Number of buffered bytes not yet part of a complete segment.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
        self.scanned = 0;
    }

    /// Offset just past the first delimiter, scanning whole code units only.
    fn next_boundary(&mut self) -> Option<usize> {
        let delimiter = self.encoding.delimiter();
        let width = self.encoding.unit_width();

        let mut offset = self.scanned;
        while offset + width <= self.pending.len() {
            if &self.pending[offset..offset + width] == delimiter {
                return Some(offset + width);
            }
            offset += width;
        }

        self.scanned = offset;
        None
    }
}
