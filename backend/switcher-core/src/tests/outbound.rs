use super::{drain, log_lines, ui_channel};

use crate::connection::outbound::OutboundWriter;
use crate::constants::SENT_INFO_MESSAGE;
use crate::device::DeviceState;
use crate::error::connection::ConnectionError;
use crate::protocol::{MessageCodec, WireEncoding};

use models::{LightState, Record};

use tokio::io::{AsyncReadExt, duplex};

#[tokio::test]
async fn given_open_writer_when_record_sent_then_peer_reads_encoded_bytes() {
    // GIVEN
    let (ui, mut events) = ui_channel(false);
    let (local, mut peer) = duplex(256);
    let codec = MessageCodec::new(WireEncoding::Utf16Le);
    let writer = OutboundWriter::new(Box::new(local), codec, ui);

    // WHEN
    writer
        .send(&Record::device("LightSwitcher"))
        .await
        .expect("Send should succeed");

    // THEN
    let expected = WireEncoding::Utf16Le.encode("Device: LightSwitcher;");
    let mut received = vec![0u8; expected.len()];
    peer.read_exact(&mut received).await.expect("Peer read");
    assert_eq!(received, expected);
    assert_eq!(log_lines(&drain(&mut events)), vec![SENT_INFO_MESSAGE]);
}

#[tokio::test]
async fn given_verbose_ui_when_lights_sent_then_sent_line_is_logged() {
    let (ui, mut events) = ui_channel(true);
    let (local, _peer) = duplex(256);
    let writer = OutboundWriter::new(Box::new(local), MessageCodec::default(), ui);

    writer
        .send(&Record::lights(LightState::On))
        .await
        .expect("Send should succeed");

    assert_eq!(
        log_lines(&drain(&mut events)),
        vec!["Network: Sent lights status: True"]
    );
}

/// **VALUE**: Verifies a closed writer refuses further sends and the peer sees EOF.
///
/// **BUG THIS CATCHES**: Writes after disconnect silently disappearing instead of
/// reporting that no connection exists.
#[tokio::test]
async fn given_closed_writer_when_sending_then_fails_with_not_connected() {
    // GIVEN
    let (ui, _events) = ui_channel(false);
    let (local, mut peer) = duplex(256);
    let writer = OutboundWriter::new(Box::new(local), MessageCodec::default(), ui);

    // WHEN
    writer.close().await;
    let result = writer.send(&Record::lights(LightState::Off)).await;

    // THEN
    assert!(matches!(result, Err(ConnectionError::NotConnected { .. })));
    let mut buffer = [0u8; 8];
    assert_eq!(peer.read(&mut buffer).await.expect("Peer read"), 0);
}

#[tokio::test]
async fn given_producer_returns_none_when_send_with_then_nothing_written() {
    // GIVEN
    let (ui, mut events) = ui_channel(true);
    let (local, mut peer) = duplex(256);
    let writer = OutboundWriter::new(Box::new(local), MessageCodec::default(), ui);

    // WHEN
    writer.send_with(|| None).await.expect("Empty send should succeed");
    writer.close().await;

    // THEN
    let mut received = Vec::new();
    peer.read_to_end(&mut received).await.expect("Peer read");
    assert!(received.is_empty());
    assert!(drain(&mut events).is_empty());
}

/// **VALUE**: Verifies the producer runs even when the writer is gone.
///
/// **WHY THIS MATTERS**: A local toggle performs its flip inside the producer. If a
/// closed writer skipped the producer, the light would silently stay as it was.
#[tokio::test]
async fn given_closed_writer_when_send_with_then_producer_runs_and_not_connected_returned() {
    // GIVEN
    let (ui, _events) = ui_channel(false);
    let (local, _peer) = duplex(256);
    let writer = OutboundWriter::new(Box::new(local), MessageCodec::default(), ui);
    writer.close().await;
    let mut ran = false;

    // WHEN
    let result = writer
        .send_with(|| {
            ran = true;
            Some(Record::lights(LightState::On))
        })
        .await;

    // THEN
    assert!(ran);
    assert!(matches!(result, Err(ConnectionError::NotConnected { .. })));
}

/// **VALUE**: Verifies flips made inside `send_with` reach the wire in flip order.
///
/// **WHY THIS MATTERS**: The local UI and the receive loop both flip the light and push
/// the result. The peer only ever keeps the last `Lights:` record it reads.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - The flip happens before the send lock is taken, letting two pushes swap places
/// - The peer's final view disagrees with the device
#[tokio::test]
async fn given_two_senders_toggling_when_interleaved_then_last_record_matches_device() {
    // GIVEN
    let (ui, _events) = ui_channel(false);
    let (local, mut peer) = duplex(64 * 1024);
    let codec = MessageCodec::new(WireEncoding::Utf16Le);
    let writer = OutboundWriter::new(Box::new(local), codec, ui.clone());
    let device = DeviceState::new(LightState::Off, ui);

    // WHEN
    let senders: Vec<_> = (0..2)
        .map(|_| {
            let writer = writer.clone();
            let device = device.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    writer
                        .send_with(|| Some(Record::lights(device.toggle())))
                        .await
                        .expect("Send should succeed");
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for sender in senders {
        sender.await.expect("Sender task panicked");
    }
    writer.close().await;

    // THEN
    let mut received = Vec::new();
    peer.read_to_end(&mut received).await.expect("Peer read");
    let units: Vec<u16> = received
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    let text = String::from_utf16(&units).expect("Valid UTF-16");
    let records: Vec<&str> = text.split_terminator(';').collect();

    assert_eq!(records.len(), 100);
    let expected = format!("Lights: {}", device.get().as_wire());
    assert_eq!(records.last().copied(), Some(expected.as_str()));
}
