use models::Record;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

/// Decoded records waiting for dispatch.
///
/// Appending a read batch and draining it happen under one guard, so a
/// dispatch never iterates a half-filled batch even if a second producer
/// shows up later.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordCache {
    records: Arc<Mutex<Vec<Record>>>,
}

impl RecordCache {
    pub(crate) async fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records.lock().await
    }
}
