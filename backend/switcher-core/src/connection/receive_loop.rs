//! Background reader for one session.

use crate::connection::outbound::OutboundWriter;
use crate::connection::record_cache::RecordCache;
use crate::error::connection::ConnectionError;
use crate::protocol::dispatcher::unknown_data_line;
use crate::protocol::{CommandDispatcher, Framer, MessageCodec};
use crate::ui::UiHandle;

use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::sync::CancellationToken;

/// Why the loop stopped.
#[derive(Debug)]
pub(crate) enum LoopExit {
    /// Disconnect was requested. Not an error.
    Cancelled,
    /// The peer closed its side of the stream.
    PeerClosed,
    /// Reading, or sending a reply, failed.
    Failed(ConnectionError),
}

/// Reads, frames, decodes and dispatches until cancelled or the transport fails.
///
/// Cancellation is checked at every read boundary: a pending read is
/// abandoned as soon as the token fires, while a batch that is already being
/// dispatched always runs to completion.
pub(crate) struct ReceiveLoop<R> {
    reader: R,
    framer: Framer,
    codec: MessageCodec,
    dispatcher: CommandDispatcher,
    cache: RecordCache,
    writer: OutboundWriter,
    ui: UiHandle,
    cancel: CancellationToken,
    buffer_size: usize,
}

impl<R> ReceiveLoop<R>
where
    R: AsyncRead + Unpin,
{
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        reader: R,
        codec: MessageCodec,
        dispatcher: CommandDispatcher,
        cache: RecordCache,
        writer: OutboundWriter,
        ui: UiHandle,
        cancel: CancellationToken,
        buffer_size: usize,
    ) -> Self {
        Self {
            reader,
            framer: Framer::new(codec.encoding()),
            codec,
            dispatcher,
            cache,
            writer,
            ui,
            cancel,
            buffer_size,
        }
    }

    pub(crate) async fn run(mut self) -> LoopExit {
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let read = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return LoopExit::Cancelled,
                read = self.reader.read(&mut buffer) => read,
            };

            match read {
                Ok(0) => return LoopExit::PeerClosed,
                Ok(count) => {
                    trace!("Received {count} bytes");
                    if let Err(e) = self.process_chunk(&buffer[..count]).await {
                        return LoopExit::Failed(e);
                    }
                }
                Err(e) => return LoopExit::Failed(ConnectionError::from(e)),
            }
        }
    }

    async fn process_chunk(&mut self, chunk: &[u8]) -> Result<(), ConnectionError> {
        let mut batch = Vec::new();
        for segment in self.framer.feed(chunk) {
            match self.codec.decode(&segment) {
                Ok(record) => batch.push(record),
                Err(e) => {
                    debug!("{e}");
                    self.ui.log(unknown_data_line(e.segment_text()));
                }
            }
        }

        if batch.is_empty() {
            return Ok(());
        }

        let mut cached = self.cache.lock().await;
        cached.extend(batch);
        for record in cached.drain(..) {
            // Dispatch under the send lock so a flip and its push stay paired.
            self.writer
                .send_with(|| self.dispatcher.dispatch(&record))
                .await?;
        }

        Ok(())
    }
}
