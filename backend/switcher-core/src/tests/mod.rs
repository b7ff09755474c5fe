mod device;
mod endpoint;
mod codec;
mod lifecycle;
mod manager;
mod outbound;

use crate::ui::{UiHandle, VerboseLogging};

use models::UiEvent;

use tokio::sync::mpsc::UnboundedReceiver;

/// UI handle wired to a receiver the test can inspect.
fn ui_channel(verbose: bool) -> (UiHandle, UnboundedReceiver<UiEvent>) {
    UiHandle::channel(VerboseLogging::new(verbose))
}

/// Everything emitted so far, without waiting.
fn drain(receiver: &mut UnboundedReceiver<UiEvent>) -> Vec<UiEvent> {
    let mut events = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        events.push(event);
    }
    events
}

fn log_lines(events: &[UiEvent]) -> Vec<&str> {
    events
        .iter()
        .filter_map(|event| match event {
            UiEvent::Log(line) => Some(line.as_str()),
            _ => None,
        })
        .collect()
}
