//! Send side of a session.

use crate::constants::{NETWORK_LOG_LABEL, NOT_CONNECTED_MESSAGE, SENT_INFO_MESSAGE};
use crate::error::connection::ConnectionError;
use crate::protocol::MessageCodec;
use crate::ui::UiHandle;

use common::ErrorLocation;
use models::{Record, RecordKey};

use std::panic::Location;
use std::sync::Arc;

use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

pub(crate) type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Serialized writer shared by the initiating context and the receive loop.
///
/// Each record is built, written and flushed under one lock so two senders
/// can never interleave bytes on the wire.
#[derive(Clone)]
pub(crate) struct OutboundWriter {
    transport: Arc<Mutex<Option<BoxedWriter>>>,
    codec: MessageCodec,
    ui: UiHandle,
}

impl OutboundWriter {
    pub(crate) fn new(writer: BoxedWriter, codec: MessageCodec, ui: UiHandle) -> Self {
        Self {
            transport: Arc::new(Mutex::new(Some(writer))),
            codec,
            ui,
        }
    }

    /// Encode and write one record.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::NotConnected`] after [`close`](Self::close)
    /// - [`ConnectionError::Io`] if the write or flush fails
    pub(crate) async fn send(&self, record: &Record) -> Result<(), ConnectionError> {
        self.send_with(|| Some(record.clone())).await
    }

    /// Build the record while holding the transport lock, then write it.
    ///
    /// `produce` runs exactly once, even when the writer is already closed,
    /// so a state change made inside it and the record announcing it reach
    /// the wire in the same order as every other sender's. Returning `None`
    /// writes nothing.
    ///
    /// # Errors
    ///
    /// Same as [`send`](Self::send).
    pub(crate) async fn send_with<F>(&self, produce: F) -> Result<(), ConnectionError>
    where
        F: FnOnce() -> Option<Record>,
    {
        let mut guard = self.transport.lock().await;
        let Some(record) = produce() else {
            return Ok(());
        };

        let writer = guard.as_mut().ok_or_else(|| ConnectionError::NotConnected {
            message: NOT_CONNECTED_MESSAGE.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let bytes = self.codec.encode(&record);
        writer.write_all(&bytes).await?;
        writer.flush().await?;
        drop(guard);

        self.report_sent(&record);
        Ok(())
    }

    /// Shut the write half down. Later sends fail with `NotConnected`.
    pub(crate) async fn close(&self) {
        let taken = self.transport.lock().await.take();
        if let Some(mut writer) = taken {
            if let Err(e) = writer.shutdown().await {
                debug!("Transport shutdown failed (already closed?): {e}");
            }
        }
    }

    fn report_sent(&self, record: &Record) {
        match record.key() {
            RecordKey::Device => self.ui.log(SENT_INFO_MESSAGE),
            RecordKey::Lights => self.ui.verbose(format!(
                "{NETWORK_LOG_LABEL}Sent lights status: {}",
                record.value()
            )),
            RecordKey::Status => self
                .ui
                .verbose(format!("{NETWORK_LOG_LABEL}Sent status: {}", record.value())),
            RecordKey::Method => self
                .ui
                .verbose(format!("{NETWORK_LOG_LABEL}Sent method: {}", record.value())),
        }
    }
}
